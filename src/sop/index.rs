//! Document indexer: splits raw SOP documents into labeled sections.

use std::{
    collections::HashMap,
    ops::Range,
    sync::{Arc, OnceLock},
};

use regex::Regex;

// Types.

/// A raw SOP document, as supplied by an ingestion source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub name: String,
    pub text: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// A run of lines scoped to one cabin or task label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Name of the owning document.
    pub document: Arc<str>,
    /// Label as written after the marker keyword, trimmed.
    pub label: String,
    /// Lines of the section, starting with the marker line.
    pub lines: Vec<String>,
    /// 0-based line range in the source document.
    pub range: Range<usize>,
}

/// A document after indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    pub name: Arc<str>,
    pub sections: Vec<Section>,
}

/// The full section index, in document insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SopIndex {
    documents: Vec<IndexedDocument>,
}

impl SopIndex {
    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn section_count(&self) -> usize {
        self.documents.iter().map(|d| d.sections.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

// Indexing.

/// Build a fresh index from raw documents.
///
/// A later document with an already seen name replaces the earlier text but keeps its position.
pub fn index<I>(documents: I) -> SopIndex
where
    I: IntoIterator<Item = RawDocument>,
{
    let mut deduped: Vec<RawDocument> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for document in documents {
        match slots.get(&document.name) {
            Some(&slot) => deduped[slot].text = document.text,
            None => {
                slots.insert(document.name.clone(), deduped.len());
                deduped.push(document);
            }
        }
    }

    let documents = deduped.into_iter().map(|d| index_document(&d.name, &d.text)).collect();

    SopIndex { documents }
}

/// Split one document into sections.
pub fn index_document(name: &str, text: &str) -> IndexedDocument {
    let name: Arc<str> = Arc::from(name);
    let mut sections = Vec::new();
    let mut open: Option<Section> = None;

    for (number, line) in text.lines().enumerate() {
        if let Some(label) = section_label(line) {
            if let Some(section) = open.take() {
                sections.push(section);
            }

            open = Some(Section {
                document: name.clone(),
                label,
                lines: vec![line.to_string()],
                range: number..number + 1,
            });
        } else if let Some(section) = open.as_mut() {
            section.lines.push(line.to_string());
            section.range.end = number + 1;
        }
    }

    if let Some(section) = open {
        sections.push(section);
    }

    IndexedDocument { name, sections }
}

/// Return the label when `line` is a section-start marker (`Task: Casa Amore`).
pub fn section_label(line: &str) -> Option<String> {
    let captures = section_marker().captures(line)?;
    let label = captures.get(1)?.as_str().trim();

    (!label.is_empty()).then(|| label.to_string())
}

// Statics.

static SECTION_MARKER: OnceLock<Regex> = OnceLock::new();

fn section_marker() -> &'static Regex {
    SECTION_MARKER.get_or_init(|| Regex::new(r"(?i)^\s*(?:task|cabin|property)\s*:\s*(\S.*?)\s*$").expect("section marker pattern is valid"))
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const CASA_AMORE: &str = "Task: Casa Amore\nwifi_network_name: CasaAmoreGuest\nwifi_password: sunshine123\nTask: Casa Luna\nwifi_password: moonlight456\n";

    #[test]
    fn recognizes_markers_case_insensitively() {
        assert_eq!(section_label("Task: Casa Amore"), Some("Casa Amore".to_string()));
        assert_eq!(section_label("  TASK :  Casa Luna  "), Some("Casa Luna".to_string()));
        assert_eq!(section_label("cabin: Pine Hollow"), Some("Pine Hollow".to_string()));
        assert_eq!(section_label("Task:"), None);
        assert_eq!(section_label("Task:    "), None);
        assert_eq!(section_label("wifi_password: abc"), None);
        assert_eq!(section_label("Tasks: plural is not a marker"), None);
    }

    #[test]
    fn splits_example_document_into_two_sections() {
        let index = index([RawDocument::new("casa-amore.txt", CASA_AMORE)]);
        let sections = &index.documents()[0].sections;

        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].label, "Casa Amore");
        assert_eq!(sections[0].range, 0..3);
        assert_eq!(sections[0].lines.iter().skip(1).filter(|l| l.contains(':')).count(), 2);

        assert_eq!(sections[1].label, "Casa Luna");
        assert_eq!(sections[1].range, 3..5);
        assert_eq!(sections[1].lines.iter().skip(1).filter(|l| l.contains(':')).count(), 1);
        assert_eq!(&*sections[1].document, "casa-amore.txt");
    }

    #[test]
    fn sections_cover_marker_to_next_marker() {
        let text = "Preamble line\nnot: a section\nTask: A\na1\n\na2\nTask: B\nTask: C\nc1";
        let document = index_document("doc.txt", text);
        let total_lines = text.lines().count();

        assert_eq!(document.sections.len(), 3);
        assert_eq!(document.sections[0].range, 2..6);
        assert_eq!(document.sections[1].range, 6..7);
        assert_eq!(document.sections[2].range, 7..total_lines);

        // Contiguous, non-overlapping, and each range matches its lines.
        for pair in document.sections.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }

        for section in &document.sections {
            assert_eq!(section.lines.len(), section.range.len());
            assert_eq!(section.lines[0], text.lines().nth(section.range.start).unwrap());
        }
    }

    #[test]
    fn document_without_markers_has_no_sections() {
        let document = index_document("notes.txt", "just some notes\nwifi: nope");
        assert!(document.sections.is_empty());
    }

    #[test]
    fn preserves_original_line_content() {
        let document = index_document("doc.txt", "Task: A\r\n   indented: value  \r\n");

        assert_eq!(document.sections[0].lines, vec!["Task: A".to_string(), "   indented: value  ".to_string()]);
    }

    #[test]
    fn keeps_duplicate_labels_in_order() {
        let document = index_document("doc.txt", "Task: A\nfirst\nTask: A\nsecond");

        assert_eq!(document.sections.len(), 2);
        assert_eq!(document.sections[0].lines[1], "first");
        assert_eq!(document.sections[1].lines[1], "second");
    }

    #[test]
    fn later_duplicate_document_replaces_text_in_place() {
        let index = index([
            RawDocument::new("a.txt", "Task: Old\nx"),
            RawDocument::new("b.txt", "Task: B\ny"),
            RawDocument::new("a.txt", "Task: New\nz"),
        ]);

        let names = index.documents().iter().map(|d| d.name.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(index.documents()[0].sections[0].label, "New");
        assert_eq!(index.section_count(), 2);
    }

    #[test]
    fn many_documents_with_duplicates_keep_first_positions() {
        let distinct = (0..20_000).map(|i| RawDocument::new(format!("doc-{i}.txt"), format!("Task: Cabin {i}\nwifi_password: v{i}\n")));
        let repeats = (0..20_000)
            .step_by(1000)
            .map(|i| RawDocument::new(format!("doc-{i}.txt"), format!("Task: Renamed {i}\nwifi_password: r{i}\n")));

        let index = index(distinct.chain(repeats));

        assert_eq!(index.document_count(), 20_000);
        assert_eq!(index.section_count(), 20_000);

        for (position, document) in index.documents().iter().enumerate() {
            assert_eq!(&*document.name, format!("doc-{position}.txt"));

            let expected = if position % 1000 == 0 { format!("Renamed {position}") } else { format!("Cabin {position}") };
            assert_eq!(document.sections[0].label, expected);
        }
    }

    #[test]
    fn empty_input_produces_empty_index() {
        let index = index(Vec::<RawDocument>::new());

        assert!(index.is_empty());
        assert_eq!(index.section_count(), 0);
    }
}
