//! The agent conversation: collect a ticket, log it, and answer from the SOPs.

use tracing::{Instrument, error, info, instrument, warn};

use crate::{
    base::types::{AgentMessage, Ticket, TicketDetails, Void},
    interaction::{
        conversation::{ConversationState, ConversationStore},
        reply,
        ticket_parser::parse_ticket,
    },
    service::{chat::ChatClient, llm::LlmClient, ticket::TicketClient},
    sop::{Resolution, SopStore},
};

/// Handles a message from an agent.
///
/// Spawns a new task to process the message, and logs any error it ends with.
#[instrument(skip_all)]
pub fn handle_agent_message(
    message: AgentMessage,
    llm_extraction_enabled: bool,
    sops: SopStore,
    llm: LlmClient,
    chat: ChatClient,
    tickets: TicketClient,
    conversations: ConversationStore,
) {
    tokio::spawn(async move {
        // Process the message.
        let result = process_agent_message(message, llm_extraction_enabled, &sops, &llm, &chat, &tickets, &conversations)
            .in_current_span()
            .await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Process a message from an agent to completion.
#[instrument(skip_all, fields(user = %message.user_id))]
pub async fn process_agent_message(
    message: AgentMessage,
    llm_extraction_enabled: bool,
    sops: &SopStore,
    llm: &LlmClient,
    chat: &ChatClient,
    tickets: &TicketClient,
    conversations: &ConversationStore,
) -> Void {
    let AgentMessage { user_id, channel_id, thread_ts, text } = message;
    let previous = conversations.get(&user_id);

    // Figure out the cabin and issue, if the message has them.

    let details = match parse_ticket(&text) {
        Some(details) => Some(details),
        None if llm_extraction_enabled => extract_with_llm(llm, &text).await,
        None => None,
    };

    let Some(details) = details else {
        let response = match previous {
            None => reply::greeting(&user_id),
            Some(_) => reply::not_understood(),
        };

        conversations.set(&user_id, ConversationState::AwaitingDetails);
        chat.send_message(&channel_id, &thread_ts, &response).await?;

        return Ok(());
    };

    info!("Ticket submitted for cabin `{}`.", details.cabin);

    let TicketDetails { cabin, issue } = details.clone();
    conversations.set(&user_id, ConversationState::Submitted { cabin: cabin.clone(), issue: issue.clone() });

    // Log the ticket before doing anything else.

    let ticket = Ticket::new(&user_id, details);

    if let Err(err) = tickets.log_ticket(&ticket).await {
        error!("Failed to log ticket: {}", err);
        chat.send_message(&channel_id, &thread_ts, &reply::ticket_log_failed()).await?;
        return Ok(());
    }

    chat.send_message(&channel_id, &thread_ts, &reply::ticket_logged(&cabin)).await?;

    // Answer from the SOPs, or fall back to the assistant.

    let response = match sops.resolve(&cabin, &issue) {
        Resolution::Match(found) => {
            info!("Matched SOP section `{}` in `{}`.", found.section, found.document);
            reply::render_match(&found)
        }
        Resolution::NoMatch => {
            info!("No SOP matched; asking the fallback assistant.");

            match llm.get_fallback_response(&cabin, &issue).await {
                Ok(answer) => reply::fallback(&cabin, &answer),
                Err(err) => {
                    warn!("Fallback assistant failed: {}", err);
                    reply::fallback_failed(&cabin)
                }
            }
        }
    };

    chat.send_message(&channel_id, &thread_ts, &response).await?;

    Ok(())
}

async fn extract_with_llm(llm: &LlmClient, text: &str) -> Option<TicketDetails> {
    match llm.extract_ticket(text).await {
        Ok(details) => details,
        Err(err) => {
            warn!("Ticket extraction failed: {}", err);
            None
        }
    }
}
