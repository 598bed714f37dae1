//! Chat orchestration
//!
//! A single ordered message log with two producers (user, bot) and a
//! two-state machine: `Idle` and `AwaitingResponse`. Submitting valid input
//! appends exactly one user message and transitions to awaiting; completion
//! appends exactly one bot message (the advisor's text, or the connection
//! apology on a caught failure) and transitions back to idle. While
//! awaiting, further submissions are rejected, so at most one request is in
//! flight per log.

use tracing::warn;

use crate::advisor::AdviceGenerator;
use crate::error::Result;
use crate::models::{ChatMessage, Sender};

/// Greeting seeded as the first bot message of every session
pub const GREETING: &str = "Hello! I'm your AI Financial Advisor from FinWise. I can help you \
with personalized financial advice based on your transaction history and current financial \
status. How can I assist you today?";

/// Bot message appended when advice generation fails outright
pub const CONNECTION_APOLOGY: &str = "I apologize, but I'm having trouble connecting to the \
server. Please try again later.";

/// Chat session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

/// Ordered message log with single-in-flight submission
#[derive(Debug)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    state: ChatState,
    next_id: u64,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    /// Create a log seeded with the greeting message
    pub fn new() -> Self {
        let mut log = Self {
            messages: Vec::new(),
            state: ChatState::Idle,
            next_id: 1,
        };
        log.push(Sender::Bot, GREETING);
        log
    }

    fn push(&mut self, sender: Sender, text: &str) -> &ChatMessage {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text: text.to_string(),
            sender,
        });
        self.next_id += 1;
        self.messages.last().expect("just pushed")
    }

    /// Submit user input.
    ///
    /// Empty or whitespace-only input is a no-op, as is submitting while a
    /// response is pending. Valid input appends one user message and moves
    /// the log to `AwaitingResponse`.
    pub fn submit(&mut self, input: &str) -> Option<&ChatMessage> {
        if self.state != ChatState::Idle {
            return None;
        }
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.state = ChatState::AwaitingResponse;
        Some(self.push(Sender::User, text))
    }

    /// Record the response for the pending submission.
    ///
    /// Appends exactly one bot message (the advisor text on success, the
    /// connection apology on failure) and returns to `Idle`. A completion
    /// with no pending submission is a no-op.
    pub fn complete(&mut self, result: Result<String>) -> Option<&ChatMessage> {
        if self.state != ChatState::AwaitingResponse {
            return None;
        }
        self.state = ChatState::Idle;

        match result {
            Ok(text) => Some(self.push(Sender::Bot, &text)),
            Err(e) => {
                warn!(error = %e, "Advice request failed, appending apology");
                Some(self.push(Sender::Bot, CONNECTION_APOLOGY))
            }
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == ChatState::AwaitingResponse
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Drives a [`ChatLog`] against an [`AdviceGenerator`]
///
/// `send` takes `&mut self`, so a single orchestrator can never have two
/// requests in flight: the structural equivalent of the disabled input box.
pub struct ChatOrchestrator {
    log: ChatLog,
    advisor: AdviceGenerator,
}

impl ChatOrchestrator {
    pub fn new(advisor: AdviceGenerator) -> Self {
        Self {
            log: ChatLog::new(),
            advisor,
        }
    }

    /// Submit input, fetch advice, and append the bot response.
    ///
    /// Returns `None` when the input was rejected (empty); otherwise the
    /// appended bot message. Advice failures are absorbed into the apology
    /// message, so this never surfaces an error to the caller.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let user_message = self.log.submit(input)?;
        let query = user_message.text.clone();

        let result = self.advisor.generate(&query).await;
        self.log.complete(result)
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::{BankClient, MockBank};
    use crate::llm::{LlmClient, MockBackend, MOCK_ADVICE};

    fn mock_advisor() -> AdviceGenerator {
        AdviceGenerator::new(BankClient::mock(), LlmClient::mock())
    }

    #[test]
    fn test_new_log_has_greeting() {
        let log = ChatLog::new();
        assert_eq!(log.messages().len(), 1);
        assert_eq!(log.messages()[0].id, 1);
        assert_eq!(log.messages()[0].sender, Sender::Bot);
        assert_eq!(log.messages()[0].text, GREETING);
        assert_eq!(log.state(), ChatState::Idle);
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut log = ChatLog::new();
        assert!(log.submit("").is_none());
        assert!(log.submit("   \n\t").is_none());
        assert_eq!(log.messages().len(), 1);
        assert_eq!(log.state(), ChatState::Idle);
    }

    #[test]
    fn test_submit_transitions_and_blocks_reentry() {
        let mut log = ChatLog::new();
        let message = log.submit("  hello  ").unwrap();
        assert_eq!(message.text, "hello");
        assert_eq!(message.sender, Sender::User);
        assert!(log.is_awaiting());

        // second submission while awaiting is rejected
        assert!(log.submit("again").is_none());
        assert_eq!(log.messages().len(), 2);
    }

    #[test]
    fn test_complete_appends_exactly_one_bot_message() {
        let mut log = ChatLog::new();
        log.submit("hello");
        let reply = log.complete(Ok("advice".to_string())).unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(reply.text, "advice");
        assert_eq!(log.state(), ChatState::Idle);
        assert_eq!(log.messages().len(), 3);

        // stray completion with nothing pending is a no-op
        assert!(log.complete(Ok("extra".to_string())).is_none());
        assert_eq!(log.messages().len(), 3);
    }

    #[test]
    fn test_complete_failure_appends_apology() {
        let mut log = ChatLog::new();
        log.submit("hello");
        let reply = log
            .complete(Err(crate::error::Error::InvalidData("boom".into())))
            .unwrap();
        assert_eq!(reply.text, CONNECTION_APOLOGY);
        assert_eq!(log.state(), ChatState::Idle);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut log = ChatLog::new();
        log.submit("one");
        log.complete(Ok("reply one".to_string()));
        log.submit("two");
        log.complete(Ok("reply two".to_string()));

        let ids: Vec<u64> = log.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_orchestrator_turn_order() {
        let mut chat = ChatOrchestrator::new(mock_advisor());
        let reply = chat.send("How are my finances?").await.unwrap();
        assert_eq!(reply.text, MOCK_ADVICE);

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].sender, Sender::Bot);
    }

    #[tokio::test]
    async fn test_orchestrator_empty_input() {
        let mut chat = ChatOrchestrator::new(mock_advisor());
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_orchestrator_total_failure_yields_apology() {
        let advisor = AdviceGenerator::new(
            BankClient::Mock(MockBank::failing()),
            LlmClient::Mock(MockBackend::failing()),
        );
        let mut chat = ChatOrchestrator::new(advisor);
        let reply = chat.send("help").await.unwrap();
        assert_eq!(reply.text, CONNECTION_APOLOGY);
        assert_eq!(chat.log().state(), ChatState::Idle);
    }
}
