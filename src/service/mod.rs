//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by sol-bot:
//! - Chat services (e.g., Slack)
//! - LLM services (e.g., OpenAI)
//! - Ticket logging (e.g., a spreadsheet webhook)
//! - SOP ingestion (a directory on disk, and an HTTP sync endpoint)
//!
//! Each client service defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
pub mod sop;
pub mod ticket;
