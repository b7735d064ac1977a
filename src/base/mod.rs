//! Core components, types, and utilities for sol-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System directives for LLM interactions.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
