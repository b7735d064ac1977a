//! Runtime services and shared state for sol-bot.

use std::path::Path;

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::conversation::ConversationStore,
    service::{
        chat::ChatClient,
        llm::LlmClient,
        sop::{load_directory, sync},
        ticket::TicketClient,
    },
    sop::SopStore,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the SOP store, the service clients, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The current SOP index.
    pub sops: SopStore,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The ticket client instance.
    pub tickets: TicketClient,
    /// Per-agent conversation state.
    pub conversations: ConversationStore,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Load the SOPs from disk.
        let sops = SopStore::default();
        let documents = load_directory(Path::new(&config.sop_directory)).await?;
        sops.reindex(documents);

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the ticket client.
        let tickets = TicketClient::webhook(&config)?;

        // Initialize the chat client.
        let conversations = ConversationStore::default();
        let chat = ChatClient::slack(&config, sops.clone(), llm.clone(), tickets.clone(), conversations.clone()).await?;

        Ok(Self {
            config,
            sops,
            llm,
            tickets,
            conversations,
            chat,
        })
    }

    /// Run the chat listener and the SOP sync endpoint until either stops.
    pub async fn start(&self) -> Void {
        info!("Starting chat listener and SOP sync endpoint ...");

        tokio::select! {
            result = self.chat.start() => result,
            result = sync::serve(&self.config, self.sops.clone()) => result,
        }
    }
}
