//! Query resolver: finds the SOP section for a cabin and issue, and extracts its fields.

use super::{
    index::{Section, SopIndex},
    normalize::{keywords, normalize},
};

// Types.

/// Outcome of resolving a ticket against the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Match(SopMatch),
    NoMatch,
}

/// A matched section, rendered into display entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SopMatch {
    /// Name of the document the section came from.
    pub document: String,
    /// Label of the matched section.
    pub section: String,
    /// Fields and notes, in source order.
    pub entries: Vec<Entry>,
    /// Bare network password values, ready for a guest-facing reply.
    pub suggested_replies: Vec<String>,
}

/// One displayable line of a matched section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Field { label: String, value: String },
    Note(String),
}

/// A `label: value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    pub label: &'a str,
    pub value: &'a str,
}

impl<'a> Field<'a> {
    /// Split a line on its first colon.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (label, value) = line.split_once(':')?;
        Some(Self { label, value })
    }

    /// Label with separators turned into spaces and trailing digits removed, lowercased.
    ///
    /// `wifi_password1` and `wifi_password2` both become `wifi password`.
    pub fn semantic_label(&self) -> String {
        self.label
            .replace(['_', '-'], " ")
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .trim()
            .to_lowercase()
    }

    /// Label as shown to the agent.
    pub fn display_label(&self) -> String {
        let semantic = self.semantic_label();
        let words = semantic.split_whitespace().collect::<Vec<_>>();

        if is_network_name(&words) {
            "WiFi Network".to_string()
        } else if is_network_password(&words) {
            "Password".to_string()
        } else {
            words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" ")
        }
    }

    pub fn is_network_password(&self) -> bool {
        let semantic = self.semantic_label();
        let words = semantic.split_whitespace().collect::<Vec<_>>();

        is_network_password(&words)
    }

    pub fn trimmed_value(&self) -> &'a str {
        self.value.trim()
    }
}

// Resolution.

/// Resolve a cabin and issue against the index.
///
/// A section is a candidate when its normalized label contains the normalized cabin, and it
/// qualifies when any issue keyword occurs in its normalized text. The first qualifying
/// section, in document then section order, wins.
pub fn resolve(index: &SopIndex, cabin: &str, issue: &str) -> Resolution {
    let cabin = normalize(cabin);
    let cabin = cabin.trim();
    let keywords = keywords(issue);

    if cabin.is_empty() || keywords.is_empty() {
        return Resolution::NoMatch;
    }

    index
        .documents()
        .iter()
        .flat_map(|document| document.sections.iter())
        .find(|section| is_candidate(section, cabin) && qualifies(section, &keywords))
        .map(|section| Resolution::Match(extract(section)))
        .unwrap_or(Resolution::NoMatch)
}

fn is_candidate(section: &Section, normalized_cabin: &str) -> bool {
    normalize(&section.label).trim().contains(normalized_cabin)
}

fn qualifies(section: &Section, keywords: &[String]) -> bool {
    let text = normalize(&section.lines.join("\n"));
    keywords.iter().any(|k| text.contains(k.as_str()))
}

/// Turn a section's body (everything after the marker line) into entries.
pub fn extract(section: &Section) -> SopMatch {
    let mut entries = Vec::new();
    let mut suggested_replies = Vec::new();

    for line in section.lines.iter().skip(1) {
        if let Some(field) = Field::parse(line) {
            let value = field.trimmed_value().to_string();

            if field.is_network_password() && !value.is_empty() {
                suggested_replies.push(value.clone());
            }

            entries.push(Entry::Field {
                label: field.display_label(),
                value,
            });
        } else if !line.trim().is_empty() {
            entries.push(Entry::Note(line.trim().to_string()));
        }
    }

    SopMatch {
        document: section.document.to_string(),
        section: section.label.clone(),
        entries,
        suggested_replies,
    }
}

// Helpers.

fn is_network_name(words: &[&str]) -> bool {
    matches!(
        words,
        ["ssid"] | ["wifi"] | ["wifi", "name"] | ["wifi", "network"] | ["wifi", "network", "name"] | ["wifi", "ssid"] | ["network", "name"] | ["network"]
    )
}

fn is_network_password(words: &[&str]) -> bool {
    let secret = words.iter().any(|w| matches!(*w, "password" | "passphrase" | "pass" | "key" | "pw"));
    let network = words.iter().any(|w| matches!(*w, "wifi" | "network" | "internet" | "wireless"));

    match words {
        ["password"] | ["passphrase"] => true,
        _ => secret && network,
    }
}

fn title_case(word: &str) -> String {
    if word == "wifi" {
        return "WiFi".to_string();
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Tests.
