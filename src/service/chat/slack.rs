//! Chat service integration for sol-bot.
//!
//! This module provides the Slack implementation of `GenericChatClient`:
//! - Receiving agent messages and the `/sops` command over socket mode
//! - Sending replies to channels and threads

use crate::{
    base::{
        config::Config,
        types::{AgentMessage, Res, Void},
    },
    interaction::{self, conversation::ConversationStore},
    service::{llm::LlmClient, ticket::TicketClient},
    sop::SopStore,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{info, instrument, warn};

use std::{ops::Deref, path::PathBuf, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, sops: SopStore, llm: LlmClient, tickets: TicketClient, conversations: ConversationStore) -> Res<Self> {
        let client = SlackChatClient::new(config, sops, llm, tickets, conversations).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    sops: SopStore,
    llm: LlmClient,
    chat: ChatClient,
    tickets: TicketClient,
    conversations: ConversationStore,
    bot_user_id: String,
    sop_directory: PathBuf,
    llm_extraction_enabled: bool,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
    pub config: Config,
    pub sops: SopStore,
    pub llm: LlmClient,
    pub tickets: TicketClient,
    pub conversations: ConversationStore,
}

impl Deref for SlackChatClient {
    type Target = FullClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, sops: SopStore, llm: LlmClient, tickets: TicketClient, conversations: ConversationStore) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            config: config.clone(),
            sops,
            llm,
            tickets,
            conversations,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            sops: self.sops.clone(),
            llm: self.llm.clone(),
            chat: ChatClient::from(self.clone()),
            tickets: self.tickets.clone(),
            conversations: self.conversations.clone(),
            bot_user_id: self.bot_user_id.clone(),
            sop_directory: PathBuf::from(&self.config.sop_directory),
            llm_extraction_enabled: self.config.llm_extraction_enabled,
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Start WS connections, and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message).with_link_names(true);

        if !thread_ts.is_empty() {
            request = request.with_thread_ts(SlackTs(thread_ts.to_string()));
        }

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Helpers.

/// Turn a Slack message event into an agent message, or `None` if the bot should ignore it.
fn to_agent_message(event: &SlackMessageEvent, bot_user_id: &str) -> Option<AgentMessage> {
    // Edits, joins, bot posts, and the like all carry a subtype.
    if event.subtype.is_some() || event.sender.bot_id.is_some() {
        return None;
    }

    let user_id = event.sender.user.as_ref()?.0.clone();
    if user_id == bot_user_id {
        return None;
    }

    let channel_id = event.origin.channel.as_ref()?.0.clone();
    let text = event.content.as_ref()?.text.as_deref()?;
    let text = strip_mention(text, bot_user_id);

    if text.is_empty() {
        return None;
    }

    Some(AgentMessage {
        user_id,
        channel_id,
        thread_ts: event.origin.thread_ts.as_ref().map(|ts| ts.0.clone()).unwrap_or_default(),
        text,
    })
}

/// Remove `<@BOT>` mentions so they don't end up in the ticket text.
fn strip_mention(text: &str, bot_user_id: &str) -> String {
    text.replace(&format!("<@{bot_user_id}>"), "").trim().to_string()
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
#[instrument(skip_all)]
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let text = if event.command.0 == "/sops" {
        info!("Received `/sops` command ...");
        interaction::sop_command::run_sop_command(event.text.as_deref().unwrap_or_default(), &user_state.sops, &user_state.sop_directory).await
    } else {
        warn!("[COMMAND] {:#?}", event);
        format!("Unknown command `{}`.", event.command.0)
    };

    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(text)))
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    match event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            let Some(message) = to_agent_message(&slack_message_event, &user_state.bot_user_id) else {
                info!("Skipping message event that isn't from an agent.");
                return Ok(());
            };

            info!("Received agent message ...");

            interaction::agent_message::handle_agent_message(
                message,
                user_state.llm_extraction_enabled,
                user_state.sops.clone(),
                user_state.llm.clone(),
                user_state.chat.clone(),
                user_state.tickets.clone(),
                user_state.conversations.clone(),
            );
        }
        SlackEventCallbackBody::AppMention(_) => {
            // The same text also arrives as a message event, which is handled above.
            info!("Skipping app mention event.");
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Tests.
