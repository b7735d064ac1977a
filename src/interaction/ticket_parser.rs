//! Fixed-format ticket parsing (`Cabin: ...` / `Issue: ...`).

use std::sync::OnceLock;

use regex::Regex;

use crate::base::types::TicketDetails;

static CABIN_PATTERN: OnceLock<Regex> = OnceLock::new();
static ISSUE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Parse a message written as `Cabin: <name>` and `Issue: <description>`.
///
/// Either line may come first, and Slack bold markers around the keys are ignored.
pub fn parse_ticket(text: &str) -> Option<TicketDetails> {
    let cabin = capture(cabin_pattern(), text)?;
    let issue = capture(issue_pattern(), text)?;

    Some(TicketDetails { cabin, issue })
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(1)?.as_str().trim().trim_matches('*').trim();

    (!value.is_empty()).then(|| value.to_string())
}

fn cabin_pattern() -> &'static Regex {
    CABIN_PATTERN.get_or_init(|| Regex::new(r"(?im)^[\s*_]*cabin[*_]*\s*:[*_]*(.+)$").expect("cabin pattern is valid"))
}

fn issue_pattern() -> &'static Regex {
    ISSUE_PATTERN.get_or_init(|| Regex::new(r"(?im)^[\s*_]*issue[*_]*\s*:[*_]*(.+)$").expect("issue pattern is valid"))
}
