use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A cabin and issue pulled out of an agent's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub cabin: String,
    pub issue: String,
}

/// A guest-issue ticket submitted by an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// The chat user who reported the issue.
    pub user_id: String,
    /// The cabin the issue is for, as the agent wrote it.
    pub cabin: String,
    /// The issue description, as the agent wrote it.
    pub issue: String,
}

impl Ticket {
    pub fn new(user_id: impl Into<String>, details: TicketDetails) -> Self {
        Self {
            user_id: user_id.into(),
            cabin: details.cabin,
            issue: details.issue,
        }
    }
}

/// A message posted by a human agent, stripped down to what the conversation flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMessage {
    pub user_id: String,
    pub channel_id: String,
    /// Thread to reply in; empty for a top-level message.
    pub thread_ts: String,
    pub text: String,
}

/// Raw response shape the extraction agent is asked to produce.
#[derive(Debug, Deserialize)]
pub struct LlmTicketExtraction {
    pub cabin: Option<String>,
    pub issue: Option<String>,
}

impl LlmTicketExtraction {
    /// Convert into ticket details when both parts are present and non-blank.
    pub fn into_details(self) -> Option<TicketDetails> {
        let cabin = self.cabin?.trim().to_string();
        let issue = self.issue?.trim().to_string();

        if cabin.is_empty() || issue.is_empty() {
            return None;
        }

        Some(TicketDetails { cabin, issue })
    }
}
