//! Library root for `sol-bot`.
//!
//! Sol is a Slack assistant for the support team of a short-term rental operator, designed to:
//! - Collect a cabin name and guest issue from an agent's message
//! - Log the issue as a ticket to the operator's spreadsheet webhook
//! - Answer from the cabin's standard operating procedures (SOPs) when they cover the issue
//! - Fall back to an LLM suggestion when they don't
//!
//! The SOP retrieval engine lives in [`sop`] and is pure computation. The bot integrates with
//! Slack for chat, a webhook for tickets, and OpenAI for extraction and fallback replies, each
//! behind a trait so implementations can be swapped.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;
pub mod sop;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the sol-bot runtime:
/// - Initializes the crypto provider
/// - Loads the SOPs and creates the runtime context with LLM, ticket, and chat clients
/// - Runs the chat listener and the SOP sync endpoint
pub async fn start(config: Config) -> Void {
    info!("Starting sol-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
