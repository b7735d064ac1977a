//! Slack-formatted replies sent back to agents.

use crate::sop::{Entry, SopMatch};

/// Greeting sent the first time an agent talks to the bot.
pub fn greeting(user_id: &str) -> String {
    format!("Hi there <@{user_id}>! :wave: Please paste the guest's message and tell me which cabin this is for.\n\n{}", format_hint())
}

/// Reply for a message the bot couldn't turn into a ticket.
pub fn not_understood() -> String {
    format!("Hmm... I couldn't understand that. {}", format_hint())
}

fn format_hint() -> &'static str {
    "Please format it like this:\n\n*Cabin:* Casa Amore\n*Issue:* Guest said fireplace won't turn on."
}

/// Acknowledgement sent once the ticket is logged.
pub fn ticket_logged(cabin: &str) -> String {
    format!(":memo: Got it. I've saved this issue under *{cabin}* and will check SOPs now...")
}

/// Reply when the ticket webhook fails.
pub fn ticket_log_failed() -> String {
    ":warning: I ran into an issue trying to log this. Please let the team lead know.".to_string()
}

/// Reply when no SOP matched and the fallback assistant answered.
pub fn fallback(cabin: &str, answer: &str) -> String {
    format!(":mag: I couldn't find an SOP for this at *{cabin}*, so here's my best suggestion:\n\n{}", answer.trim())
}

/// Reply when no SOP matched and the fallback assistant is unavailable.
pub fn fallback_failed(cabin: &str) -> String {
    format!(":mag: I couldn't find an SOP for this at *{cabin}*, and the assistant is unavailable right now. Please check the cabin's SOP folder directly.")
}

/// Render a matched SOP section.
pub fn render_match(found: &SopMatch) -> String {
    let mut reply = format!(":blue_book: Found this in the SOP for *{}* (`{}`):\n", found.section, found.document);

    for entry in &found.entries {
        match entry {
            Entry::Field { label, value } => reply.push_str(&format!("\n• *{label}:* {value}")),
            Entry::Note(note) => reply.push_str(&format!("\n• {note}")),
        }
    }

    if found.entries.is_empty() {
        reply.push_str("\n_The section has no details yet._");
    }

    for password in &found.suggested_replies {
        reply.push_str(&format!(
            "\n\n:speech_balloon: *Suggested guest reply:*\n> Hi! So sorry about the trouble. The WiFi password is `{password}`. Let us know if you still can't connect!"
        ));
    }

    reply
}
