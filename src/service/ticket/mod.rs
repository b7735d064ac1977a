pub mod webhook;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Ticket, Void};

// Traits.

/// Generic ticket logging trait that clients must implement.
///
/// Every ticket an agent submits is logged here before the bot searches the SOPs,
/// so the operator keeps a record of guest issues per cabin.
#[async_trait]
pub trait GenericTicketClient: Send + Sync + 'static {
    /// Record a submitted ticket.
    async fn log_ticket(&self, ticket: &Ticket) -> Void;
}

// Structs.

/// Ticket client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TicketClient {
    inner: Arc<dyn GenericTicketClient>,
}

impl Deref for TicketClient {
    type Target = dyn GenericTicketClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl TicketClient {
    pub fn new(inner: Arc<dyn GenericTicketClient>) -> Self {
        Self { inner }
    }
}
