//! Spreadsheet webhook implementation of the ticket client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{Res, Ticket, Void},
};

use super::{GenericTicketClient, TicketClient};

// Extra methods on `TicketClient` applied by the webhook implementation.

impl TicketClient {
    pub fn webhook(config: &Config) -> Res<Self> {
        let client = WebhookTicketClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Types.

/// Body posted to the spreadsheet webhook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTicketPayload<'a> {
    pub issue_details: &'a str,
    pub cabin_name: &'a str,
    pub user_email: String,
    pub submitted_at: String,
}

impl<'a> WebhookTicketPayload<'a> {
    pub fn from_ticket(ticket: &'a Ticket) -> Self {
        Self {
            issue_details: &ticket.issue,
            cabin_name: &ticket.cabin,
            user_email: format!("{}@slack.user", ticket.user_id),
            submitted_at: Utc::now().to_rfc3339(),
        }
    }
}

// Specific implementations.

/// Webhook ticket client implementation.
#[derive(Clone)]
pub struct WebhookTicketClient {
    client: reqwest::Client,
    url: String,
}

impl WebhookTicketClient {
    /// Create a new webhook ticket client.
    #[instrument(name = "WebhookTicketClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.ticket_webhook_timeout_secs)).build()?;

        Ok(Self {
            client,
            url: config.ticket_webhook_url.clone(),
        })
    }
}

#[async_trait]
impl GenericTicketClient for WebhookTicketClient {
    #[instrument(name = "WebhookTicketClient::log_ticket", skip_all, fields(cabin = %ticket.cabin))]
    async fn log_ticket(&self, ticket: &Ticket) -> Void {
        let payload = WebhookTicketPayload::from_ticket(ticket);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to post ticket to webhook: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Ticket webhook responded with status {status}."));
        }

        info!("Logged ticket for cabin `{}`.", ticket.cabin);

        Ok(())
    }
}

// Tests.
