pub mod openai;

use crate::base::types::{Res, TicketDetails};
use async_trait::async_trait;
use std::{ops::Deref, sync::Arc};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large language models.
/// Implementing this trait allows different LLM providers to be used with sol-bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Extract a cabin and issue from a free-text agent message.
    ///
    /// Used when the agent didn't use the `Cabin:` / `Issue:` format.  Returns `None` when
    /// the model can't find both.
    async fn extract_ticket(&self, message: &str) -> Res<Option<TicketDetails>>;

    /// Generate a conversational answer for an issue no SOP covers.
    async fn get_fallback_response(&self, cabin: &str, issue: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
