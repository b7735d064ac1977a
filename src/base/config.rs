//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI model to use
fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default sampling temperature for the OpenAI model
fn default_openai_temperature() -> f32 {
    0.3
}

/// Default max output tokens for OpenAI model
fn default_openai_max_tokens() -> u32 {
    2048
}

/// Default system directive for the extraction agent.
fn default_extraction_agent_system_directive() -> String {
    prompts::EXTRACTION_AGENT_SYSTEM_DIRECTIVE.to_string()
}

/// Default system directive for the fallback agent.
fn default_fallback_agent_system_directive() -> String {
    prompts::FALLBACK_AGENT_SYSTEM_DIRECTIVE.to_string()
}

fn default_llm_extraction_enabled() -> bool {
    true
}

fn default_ticket_webhook_timeout_secs() -> u64 {
    15
}

fn default_sop_directory() -> String {
    "sops".to_string()
}

fn default_sync_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_sync_max_payload_bytes() -> usize {
    10 * 1024 * 1024
}

/// Configuration for the sol-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI model used for extraction and fallback replies (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature for the OpenAI model (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2.  Only applied to `gpt` models.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for OpenAI model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Optional custom extraction directive to override the default (`EXTRACTION_AGENT_SYSTEM_DIRECTIVE`).
    #[serde(default = "default_extraction_agent_system_directive")]
    pub extraction_agent_system_directive: String,
    /// Optional custom fallback directive to override the default (`FALLBACK_AGENT_SYSTEM_DIRECTIVE`).
    #[serde(default = "default_fallback_agent_system_directive")]
    pub fallback_agent_system_directive: String,
    /// Whether to ask the LLM for cabin and issue when the fixed format doesn't parse (`LLM_EXTRACTION_ENABLED`).
    #[serde(default = "default_llm_extraction_enabled")]
    pub llm_extraction_enabled: bool,
    /// Slack app token (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Spreadsheet webhook that tickets are posted to (`TICKET_WEBHOOK_URL`).
    pub ticket_webhook_url: String,
    /// Timeout for a single webhook post, in seconds (`TICKET_WEBHOOK_TIMEOUT_SECS`).
    #[serde(default = "default_ticket_webhook_timeout_secs")]
    pub ticket_webhook_timeout_secs: u64,
    /// Directory the SOP documents are loaded from on startup and reload (`SOP_DIRECTORY`).
    #[serde(default = "default_sop_directory")]
    pub sop_directory: String,
    /// Address the SOP sync endpoint listens on (`SYNC_BIND_ADDRESS`).
    #[serde(default = "default_sync_bind_address")]
    pub sync_bind_address: String,
    /// Largest accepted sync payload, in bytes (`SYNC_MAX_PAYLOAD_BYTES`).
    #[serde(default = "default_sync_max_payload_bytes")]
    pub sync_max_payload_bytes: usize,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("SOL_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.sync_max_payload_bytes == 0 {
            return Err(anyhow::anyhow!("Sync max payload bytes must be greater than 0."));
        }

        if self.ticket_webhook_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Ticket webhook timeout must be greater than 0."));
        }

        Ok(())
    }
}
