//! Event handling and agent interactions for sol-bot.
//!
//! This module provides functionality for handling chat events:
//! - Tracking each agent's place in the ticket conversation
//! - Parsing tickets and answering them from the SOPs or the fallback assistant
//! - Rendering replies and running the `/sops` slash command

pub mod agent_message;
pub mod conversation;
pub mod reply;
pub mod sop_command;
pub mod ticket_parser;
