//! OpenAI implementation of the LLM client.
//!
//! Both agents are single-shot calls to the Responses API: the extraction agent returns a strict
//! JSON object, and the fallback agent returns Slack-formatted text.

use std::time::Duration;
use std::sync::{Arc, OnceLock};

use crate::base::{
    config::Config,
    types::{LlmTicketExtraction, Res, TicketDetails},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        Content, CreateResponseArgs, Input, InputItem, InputMessageArgs, OutputContent, Response, ResponseFormatJsonSchema, Role, TextConfig, TextResponseFormat,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build the extraction input.
    fn build_extraction_input(&self, message: &str) -> Res<Input> {
        Ok(Input::Items(vec![InputItem::Message(
            InputMessageArgs::default()
                .role(Role::User)
                .content(format!("# Agent Message\n\n{message}\n\n"))
                .build()?,
        )]))
    }

    /// Build the fallback input.
    fn build_fallback_input(&self, cabin: &str, issue: &str) -> Res<Input> {
        Ok(Input::Items(vec![
            InputItem::Message(
                InputMessageArgs::default()
                    .role(Role::Developer)
                    .content(format!("## Cabin\n\n{cabin}\n\n"))
                    .build()?,
            ),
            InputItem::Message(
                InputMessageArgs::default()
                    .role(Role::User)
                    .content(format!("# Guest Issue\n\n{issue}\n\n"))
                    .build()?,
            ),
        ]))
    }

    /// Prepare a request with the shared model settings.
    fn build_request(&self, instructions: &str, text_config: TextConfig, input: Input) -> CreateResponseArgs {
        let mut request = CreateResponseArgs::default();
        request
            .instructions(instructions.to_string())
            .max_output_tokens(self.config.openai_max_tokens)
            .model(&self.config.openai_model)
            .text(text_config)
            .input(input);

        // Add the temperature for the non-reasoning models.
        if self.config.openai_model.starts_with("gpt") {
            request.temperature(self.config.openai_temperature);
        }

        request
    }

    /// Helper function to make OpenAI API calls with retry logic and timeout handling.
    async fn call_openai_api(&self, request_builder: CreateResponseArgs) -> Res<Response> {
        const MAX_RETRIES: u32 = 3;
        const TIMEOUT: u64 = 120;
        const RETRY_DELAY_MS: u64 = 1000;

        let mut retries = 0;

        loop {
            let request = request_builder.build()?;
            let result = timeout(Duration::from_secs(TIMEOUT), self.client.responses().create(request)).await;

            match result {
                Ok(Ok(response)) => {
                    info!("OpenAI API call succeeded after {} attempts", retries + 1);
                    return Ok(response);
                }
                Ok(Err(err)) => {
                    if retries >= MAX_RETRIES {
                        return Err(anyhow::anyhow!("OpenAI API call failed after {MAX_RETRIES} retries: {err}"));
                    }
                    retries += 1;
                    warn!("OpenAI API call failed, retrying {retries}/{MAX_RETRIES}: {err}");

                    let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(retries - 1));
                    tokio::time::sleep(delay).await;
                }
                Err(_) => {
                    if retries >= MAX_RETRIES {
                        return Err(anyhow::anyhow!("OpenAI API call timed out after {MAX_RETRIES} attempts"));
                    }
                    retries += 1;
                    warn!("OpenAI API call timed out, retrying {retries}/{MAX_RETRIES}");

                    let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(retries - 1));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::extract_ticket", skip_all)]
    async fn extract_ticket(&self, message: &str) -> Res<Option<TicketDetails>> {
        let input = self.build_extraction_input(message)?;
        let request = self.build_request(&self.config.extraction_agent_system_directive, get_openai_extraction_text_config().clone(), input);

        let response = self.call_openai_api(request).await?;
        let text = parse_openai_text(&response)?;

        parse_ticket_extraction(&text)
    }

    #[instrument(name = "OpenAiLlmClient::get_fallback_response", skip_all)]
    async fn get_fallback_response(&self, cabin: &str, issue: &str) -> Res<String> {
        let input = self.build_fallback_input(cabin, issue)?;
        let request = self.build_request(&self.config.fallback_agent_system_directive, TextConfig { format: TextResponseFormat::Text }, input);

        let response = self.call_openai_api(request).await?;
        let text = parse_openai_text(&response)?;

        if text.trim().is_empty() {
            return Err(anyhow::anyhow!("OpenAI returned an empty fallback response."));
        }

        Ok(text)
    }
}

/// Collect the text outputs of an OpenAI response.
#[instrument(skip_all)]
pub fn parse_openai_text(response: &Response) -> Res<String> {
    let mut result = Vec::new();

    for output in &response.output {
        match output {
            OutputContent::Message(message) => {
                for message_content in &message.content {
                    match message_content {
                        Content::OutputText(text) => result.push(text.text.clone()),
                        Content::Refusal(reason) => {
                            return Err(anyhow::anyhow!("Request refused: {reason:#?}"));
                        }
                    }
                }
            }
            _ => {
                warn!("Unknown output: {output:#?}");
            }
        }
    }

    Ok(result.join("\n\n"))
}

/// Parse the extraction agent's JSON, tolerating a wrapping code fence.
pub fn parse_ticket_extraction(text: &str) -> Res<Option<TicketDetails>> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    let extraction: LlmTicketExtraction = serde_json::from_str(unfenced.trim())?;

    Ok(extraction.into_details())
}

// Statics.

static OPENAI_EXTRACTION_TEXT_CONFIG: OnceLock<TextConfig> = OnceLock::new();

fn get_openai_extraction_text_config() -> &'static TextConfig {
    OPENAI_EXTRACTION_TEXT_CONFIG.get_or_init(|| TextConfig {
        format: TextResponseFormat::JsonSchema(ResponseFormatJsonSchema {
            name: "SolBotTicketExtraction".to_string(),
            description: Some("Cabin name and issue description pulled from an agent message.".to_string()),
            schema: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "cabin": { "type": ["string", "null"] },
                    "issue": { "type": ["string", "null"] }
                },
                "required": ["cabin", "issue"],
                "additionalProperties": false
            })),
            strict: Some(true),
        }),
    })
}

// Tests.
