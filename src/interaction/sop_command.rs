//! The `/sops` slash command.

use std::path::Path;

use tracing::{error, instrument};

use crate::{
    service::sop::load_directory,
    sop::{SopIndex, SopStore},
};

/// Run a `/sops` subcommand and return the text to reply with.
///
/// - `status` (or nothing): what is loaded right now.
/// - `reload`: re-read the SOP directory and replace the index.
#[instrument(skip(sops))]
pub async fn run_sop_command(arguments: &str, sops: &SopStore, sop_directory: &Path) -> String {
    match arguments.trim().to_lowercase().as_str() {
        "" | "status" => render_status(&sops.snapshot()),
        "reload" => match load_directory(sop_directory).await {
            Ok(documents) => {
                let index = sops.reindex(documents);
                format!(":arrows_counterclockwise: Reloaded SOPs from `{}`.\n{}", sop_directory.display(), render_status(&index))
            }
            Err(err) => {
                error!("Failed to reload SOPs: {}", err);
                format!(":warning: I couldn't reload the SOPs from `{}`. The previous SOPs are still loaded.", sop_directory.display())
            }
        },
        other => format!("Unknown subcommand `{other}`. Usage: `/sops [status|reload]`"),
    }
}

fn render_status(index: &SopIndex) -> String {
    if index.is_empty() {
        return "No SOP documents are loaded.".to_string();
    }

    let mut status = format!("{} SOP documents with {} sections are loaded:", index.document_count(), index.section_count());

    for document in index.documents() {
        status.push_str(&format!("\n• `{}` ({} sections)", document.name, document.sections.len()));
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sop::{RawDocument, Resolution};

    #[tokio::test]
    async fn status_lists_documents() {
        let sops = SopStore::default();
        sops.reindex(vec![RawDocument::new("casa-amore.txt", "Task: Casa Amore\nwifi_password: a\nTask: Casa Luna\nwifi_password: b\n")]);

        let reply = run_sop_command("", &sops, Path::new("unused")).await;

        assert!(reply.starts_with("1 SOP documents with 2 sections"));
        assert!(reply.contains("`casa-amore.txt` (2 sections)"));
    }

    #[tokio::test]
    async fn status_of_empty_store() {
        let reply = run_sop_command("status", &SopStore::default(), Path::new("unused")).await;

        assert_eq!(reply, "No SOP documents are loaded.");
    }

    #[tokio::test]
    async fn reload_reads_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pine.txt"), "Task: Pine Hollow\nwifi_password: trees\n").unwrap();

        let sops = SopStore::default();
        sops.reindex(vec![RawDocument::new("casa-amore.txt", "Task: Casa Amore\nwifi_password: a\n")]);

        let reply = run_sop_command(" RELOAD ", &sops, dir.path()).await;

        assert!(reply.contains("Reloaded SOPs"));
        assert!(matches!(sops.resolve("Pine Hollow", "wifi"), Resolution::Match(_)));
        assert!(!matches!(sops.resolve("Casa Amore", "wifi"), Resolution::Match(_)));
    }

    #[tokio::test]
    async fn unknown_subcommand_shows_usage() {
        let reply = run_sop_command("purge", &SopStore::default(), Path::new("unused")).await;

        assert!(reply.contains("Usage"));
    }
}
