//! SOP ingestion.
//!
//! Documents reach the index two ways: loaded from a directory on disk (on startup, and on
//! `/sops reload`), or pushed by an external sync job to the HTTP endpoint in [`sync`].

pub mod sync;

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::{base::types::Res, sop::RawDocument};

/// File extensions that are treated as SOP documents.
const SOP_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load every SOP document in `directory`, sorted by file name.
///
/// A missing directory is not an error: the bot can still receive documents through the sync endpoint.
#[instrument(skip_all, fields(directory = %directory.display()))]
pub async fn load_directory(directory: &Path) -> Res<Vec<RawDocument>> {
    if !tokio::fs::try_exists(directory).await? {
        warn!("SOP directory does not exist; starting with no documents.");
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut documents = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if !is_sop_file(&path) {
            continue;
        }

        // Follows symlinks, so linked files on mounted volumes still count.
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                warn!("Skipping SOP path `{}`: {}", path.display(), err);
                continue;
            }
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            warn!("Skipping SOP file with a non UTF-8 name: {}", path.display());
            continue;
        };

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Skipping unreadable SOP file `{}`: {}", name, err);
                continue;
            }
        };

        documents.push(RawDocument { name, text });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));

    info!("Loaded {} SOP documents.", documents.len());

    Ok(documents)
}

fn is_sop_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOP_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(e)))
}
