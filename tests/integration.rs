#![cfg(test)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::{mock, predicate::eq};
use sol_bot::{
    base::types::{AgentMessage, Res, Ticket, TicketDetails, Void},
    interaction::{
        agent_message::process_agent_message,
        conversation::{ConversationState, ConversationStore},
    },
    service::{
        chat::{ChatClient, GenericChatClient},
        llm::{GenericLlmClient, LlmClient},
        ticket::{GenericTicketClient, TicketClient},
    },
    sop::{RawDocument, SopStore},
};

// Mocks.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        fn bot_user_id(&self) -> &str;
        async fn start(&self) -> Void;
        async fn send_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void;
    }
}

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn extract_ticket(&self, message: &str) -> Res<Option<TicketDetails>>;
        async fn get_fallback_response(&self, cabin: &str, issue: &str) -> Res<String>;
    }
}

mock! {
    pub Tickets {}

    #[async_trait]
    impl GenericTicketClient for Tickets {
        async fn log_ticket(&self, ticket: &Ticket) -> Void;
    }
}

// Helpers.

const CASA_AMORE: &str = "Task: Casa Amore\nwifi_network_name: CasaAmoreGuest\nwifi_password: sunshine123\nTask: Casa Luna\nwifi_password: moonlight456\n";

type Sent = Arc<Mutex<Vec<String>>>;

/// Create a mock chat client that records every message it is asked to send.
fn get_mock_chat(sent: Sent) -> MockChat {
    let mut mock = MockChat::new();

    mock.expect_bot_user_id().return_const("UBOT".to_string());
    mock.expect_start().returning(|| Ok(()));
    mock.expect_send_message().returning(move |channel_id, _, text| {
        assert_eq!(channel_id, "C01SUPPORT");
        sent.lock().unwrap().push(text.to_string());
        Ok(())
    });

    mock
}

fn get_mock_tickets_ok() -> MockTickets {
    let mut mock = MockTickets::new();
    mock.expect_log_ticket().times(1).returning(|_| Ok(()));
    mock
}

fn get_sops() -> SopStore {
    let sops = SopStore::default();
    sops.reindex(vec![RawDocument::new("casa-amore.txt", CASA_AMORE)]);
    sops
}

fn agent_message(text: &str) -> AgentMessage {
    AgentMessage {
        user_id: "U54321".to_string(),
        channel_id: "C01SUPPORT".to_string(),
        thread_ts: String::new(),
        text: text.to_string(),
    }
}

struct Harness {
    sops: SopStore,
    llm: LlmClient,
    chat: ChatClient,
    tickets: TicketClient,
    conversations: ConversationStore,
    sent: Sent,
}

impl Harness {
    fn new(llm: MockLlm, tickets: MockTickets) -> Self {
        let sent = Sent::default();

        Self {
            sops: get_sops(),
            llm: LlmClient::new(Arc::new(llm)),
            chat: ChatClient::new(Arc::new(get_mock_chat(sent.clone()))),
            tickets: TicketClient::new(Arc::new(tickets)),
            conversations: ConversationStore::default(),
            sent,
        }
    }

    async fn send(&self, text: &str, llm_extraction_enabled: bool) {
        process_agent_message(agent_message(text), llm_extraction_enabled, &self.sops, &self.llm, &self.chat, &self.tickets, &self.conversations)
            .await
            .expect("processing should succeed");
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

// Tests.

#[tokio::test]
async fn first_unparseable_message_greets_the_agent() {
    let mut llm = MockLlm::new();
    llm.expect_extract_ticket().never();
    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().never();

    let harness = Harness::new(llm, tickets);
    harness.send("hello!", false).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("<@U54321>"));
    assert!(sent[0].contains("*Cabin:*"));
    assert_eq!(harness.conversations.get("U54321"), Some(ConversationState::AwaitingDetails));
}

#[tokio::test]
async fn unparseable_message_while_awaiting_asks_for_the_format() {
    let mut llm = MockLlm::new();
    llm.expect_extract_ticket().times(1).returning(|_| Ok(None));
    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().never();

    let harness = Harness::new(llm, tickets);
    harness.conversations.set("U54321", ConversationState::AwaitingDetails);

    harness.send("the guest is upset", true).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("Hmm... I couldn't understand that."));
    assert_eq!(harness.conversations.get("U54321"), Some(ConversationState::AwaitingDetails));
}

#[tokio::test]
async fn formatted_ticket_is_logged_and_answered_from_the_sops() {
    let mut llm = MockLlm::new();
    llm.expect_extract_ticket().never();
    llm.expect_get_fallback_response().never();

    let mut tickets = MockTickets::new();
    tickets
        .expect_log_ticket()
        .with(eq(Ticket {
            user_id: "U54321".to_string(),
            cabin: "Casa Amore".to_string(),
            issue: "guest can't connect to wifi".to_string(),
        }))
        .times(1)
        .returning(|_| Ok(()));

    let harness = Harness::new(llm, tickets);
    harness.send("Cabin: Casa Amore\nIssue: guest can't connect to wifi", true).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("saved this issue under *Casa Amore*"));
    assert!(sent[1].contains("*Casa Amore* (`casa-amore.txt`)"));
    assert!(sent[1].contains("• *WiFi Network:* CasaAmoreGuest"));
    assert!(sent[1].contains("• *Password:* sunshine123"));
    assert!(sent[1].contains("The WiFi password is `sunshine123`"));
    assert!(!sent[1].contains("moonlight456"));

    assert_eq!(
        harness.conversations.get("U54321"),
        Some(ConversationState::Submitted {
            cabin: "Casa Amore".to_string(),
            issue: "guest can't connect to wifi".to_string(),
        })
    );
}

#[tokio::test]
async fn unmatched_ticket_falls_back_to_the_assistant() {
    let mut llm = MockLlm::new();
    llm.expect_get_fallback_response()
        .with(eq("Casa Luna"), eq("fireplace broken"))
        .times(1)
        .returning(|_, _| Ok("Check that the gas valve is open.".to_string()));

    let harness = Harness::new(llm, get_mock_tickets_ok());
    harness.send("Cabin: Casa Luna\nIssue: fireplace broken", false).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("couldn't find an SOP for this at *Casa Luna*"));
    assert!(sent[1].contains("Check that the gas valve is open."));
}

#[tokio::test]
async fn fallback_failure_is_reported_to_the_agent() {
    let mut llm = MockLlm::new();
    llm.expect_get_fallback_response().times(1).returning(|_, _| Err(anyhow::anyhow!("model unavailable")));

    let harness = Harness::new(llm, get_mock_tickets_ok());
    harness.send("Cabin: Casa Luna\nIssue: fireplace broken", false).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("the assistant is unavailable"));
}

#[tokio::test]
async fn free_text_ticket_is_extracted_by_the_llm() {
    let mut llm = MockLlm::new();
    llm.expect_extract_ticket().times(1).returning(|_| {
        Ok(Some(TicketDetails {
            cabin: "Casa Luna".to_string(),
            issue: "What is the wifi password?".to_string(),
        }))
    });
    llm.expect_get_fallback_response().never();

    let harness = Harness::new(llm, get_mock_tickets_ok());
    harness.send("guest at casa luna wants the wifi password", true).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].contains("*Casa Luna*"));
    assert!(sent[1].contains("moonlight456"));
}

#[tokio::test]
async fn extraction_failure_is_treated_as_not_understood() {
    let mut llm = MockLlm::new();
    llm.expect_extract_ticket().times(1).returning(|_| Err(anyhow::anyhow!("bad json")));
    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().never();

    let harness = Harness::new(llm, tickets);
    harness.send("something vague", true).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Please paste the guest's message"));
}

#[tokio::test]
async fn webhook_failure_stops_before_searching() {
    let mut llm = MockLlm::new();
    llm.expect_get_fallback_response().never();

    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().times(1).returning(|_| Err(anyhow::anyhow!("webhook down")));

    let harness = Harness::new(llm, tickets);
    harness.send("Cabin: Casa Amore\nIssue: wifi", false).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("I ran into an issue trying to log this"));
}

#[tokio::test]
async fn submitted_agent_can_start_another_ticket() {
    let mut llm = MockLlm::new();
    llm.expect_get_fallback_response().never();

    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().times(2).returning(|_| Ok(()));

    let harness = Harness::new(llm, tickets);
    harness.send("Cabin: Casa Amore\nIssue: wifi", false).await;
    harness.send("Cabin: Casa Luna\nIssue: wifi", false).await;

    let sent = harness.sent();
    assert_eq!(sent.len(), 4);
    assert!(sent[3].contains("moonlight456"));
    assert!(matches!(harness.conversations.get("U54321"), Some(ConversationState::Submitted { cabin, .. }) if cabin == "Casa Luna"));
}

#[tokio::test]
async fn resync_is_visible_to_the_next_ticket() {
    let mut llm = MockLlm::new();
    llm.expect_get_fallback_response().times(1).returning(|_, _| Ok("No idea.".to_string()));

    let mut tickets = MockTickets::new();
    tickets.expect_log_ticket().times(1).returning(|_| Ok(()));

    let harness = Harness::new(llm, tickets);
    harness.sops.reindex(vec![RawDocument::new("pine.txt", "Task: Pine Hollow\nwifi_password: trees\n")]);

    harness.send("Cabin: Casa Amore\nIssue: wifi", false).await;

    let sent = harness.sent();
    assert!(sent[1].contains("No idea."));
}
