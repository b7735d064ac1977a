//! Per-agent conversation state.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Where an agent is in the ticket conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    /// The bot has asked for the cabin and issue, and is waiting for them.
    AwaitingDetails,
    /// A ticket has been submitted for this cabin and issue.
    Submitted { cabin: String, issue: String },
}

/// In-memory conversation state, keyed by chat user ID.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone, Default)]
pub struct ConversationStore {
    states: Arc<Mutex<HashMap<String, ConversationState>>>,
}

impl ConversationStore {
    pub fn get(&self, user_id: &str) -> Option<ConversationState> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner).get(user_id).cloned()
    }

    pub fn set(&self, user_id: &str, state: ConversationState) {
        self.states.lock().unwrap_or_else(PoisonError::into_inner).insert(user_id.to_string(), state);
    }
}
