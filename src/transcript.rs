use crate::chat::{ChatMessage, MessageStatus};
use crate::webhook::ReplyText;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingReply { pending_id: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("message {0} is not awaiting a reply")]
    NotPending(String),
}

/// Result of settling an exchange: the finalized user message (absent if the
/// transcript was cleared in the meantime) and the appended bot message.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub user: Option<ChatMessage>,
    pub reply: ChatMessage,
}

/// Append-only message sequence for the current session plus the guard that
/// allows at most one exchange in flight.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    state: ExchangeState,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::greeting()],
            state: ExchangeState::Idle,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.state(), ExchangeState::AwaitingReply { .. })
    }

    /// Appends a user message in `Sending` state and moves to `AwaitingReply`.
    /// Returns `None`, leaving everything untouched, for blank text or while
    /// another exchange is outstanding.
    pub fn submit(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() || self.is_awaiting_reply() {
            return None;
        }

        let message = ChatMessage::user(text);
        self.state = ExchangeState::AwaitingReply {
            pending_id: message.id.clone(),
        };
        self.messages.push(message.clone());
        Some(message)
    }

    pub fn reconcile_success(
        &mut self,
        pending_id: &str,
        reply: ReplyText,
    ) -> Result<Reconciled, TranscriptError> {
        self.settle(pending_id, ChatMessage::bot(reply.into_string()))
    }

    pub fn reconcile_failure(&mut self, pending_id: &str) -> Result<Reconciled, TranscriptError> {
        self.settle(pending_id, ChatMessage::error_reply())
    }

    /// Resets the messages to a lone greeting. A pending exchange is not
    /// cancelled; its reply lands in the fresh transcript.
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::greeting()];
    }

    fn settle(
        &mut self,
        pending_id: &str,
        reply: ChatMessage,
    ) -> Result<Reconciled, TranscriptError> {
        match &self.state {
            ExchangeState::AwaitingReply { pending_id: id } if id == pending_id => {}
            _ => return Err(TranscriptError::NotPending(pending_id.to_string())),
        }

        // Failure is reported by the bot reply, so the user message is `Sent` either way.
        let user = self
            .messages
            .iter_mut()
            .find(|m| m.id == pending_id)
            .map(|m| {
                m.status = MessageStatus::Sent;
                m.clone()
            });

        self.messages.push(reply.clone());
        self.state = ExchangeState::Idle;

        Ok(Reconciled { user, reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Sender, ERROR_REPLY_TEXT, GREETING_ID, GREETING_TEXT};

    fn reply(text: &str) -> ReplyText {
        ReplyText::new(text)
    }

    #[test]
    fn starts_with_greeting_only() {
        let transcript = Transcript::new();

        assert_eq!(transcript.messages().len(), 1);
        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.id, GREETING_ID);
        assert_eq!(greeting.content, GREETING_TEXT);
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(*transcript.state(), ExchangeState::Idle);
    }

    #[test]
    fn submit_appends_one_sending_user_message() {
        let mut transcript = Transcript::new();

        let message = transcript.submit("Hello").unwrap();

        assert_eq!(transcript.messages().len(), 2);
        let last = transcript.messages().last().unwrap();
        assert_eq!(last, &message);
        assert_eq!(last.content, "Hello");
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.status, MessageStatus::Sending);
        assert_eq!(
            *transcript.state(),
            ExchangeState::AwaitingReply {
                pending_id: message.id.clone()
            }
        );
    }

    #[test]
    fn submit_keeps_text_as_typed() {
        let mut transcript = Transcript::new();
        let message = transcript.submit("  padded  ").unwrap();
        assert_eq!(message.content, "  padded  ");
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let mut transcript = Transcript::new();

        for text in ["", "   ", "\n\t "] {
            assert!(transcript.submit(text).is_none());
        }

        assert_eq!(transcript.messages().len(), 1);
        assert!(!transcript.is_awaiting_reply());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut transcript = Transcript::new();
        transcript.submit("first").unwrap();
        let before = transcript.messages().to_vec();

        assert!(transcript.submit("second").is_none());
        assert_eq!(transcript.messages(), before.as_slice());
    }

    #[test]
    fn success_marks_sent_and_appends_reply() {
        let mut transcript = Transcript::new();
        let pending = transcript.submit("Hello").unwrap();

        let settled = transcript
            .reconcile_success(&pending.id, reply("Hi there"))
            .unwrap();

        assert_eq!(transcript.messages().len(), 3);
        let user = &transcript.messages()[1];
        let bot = &transcript.messages()[2];
        assert_eq!(user.content, "Hello");
        assert_eq!(user.status, MessageStatus::Sent);
        assert_eq!(bot.content, "Hi there");
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.status, MessageStatus::Sent);
        assert_eq!(settled.user.as_ref(), Some(user));
        assert_eq!(&settled.reply, bot);
        assert!(!transcript.is_awaiting_reply());
    }

    #[test]
    fn failure_marks_sent_and_appends_fixed_error() {
        let mut transcript = Transcript::new();
        let pending = transcript.submit("Hello").unwrap();

        transcript.reconcile_failure(&pending.id).unwrap();

        assert_eq!(transcript.messages().len(), 3);
        assert_eq!(transcript.messages()[1].status, MessageStatus::Sent);
        assert_eq!(transcript.messages()[2].content, ERROR_REPLY_TEXT);
        assert_eq!(transcript.messages()[2].status, MessageStatus::Sent);
        assert!(transcript.submit("again").is_some());
    }

    #[test]
    fn reconciling_unknown_id_changes_nothing() {
        let mut transcript = Transcript::new();
        let pending = transcript.submit("Hello").unwrap();

        let err = transcript.reconcile_failure("nope").unwrap_err();

        assert_eq!(err, TranscriptError::NotPending("nope".to_string()));
        assert_eq!(transcript.messages().len(), 2);
        assert_eq!(transcript.messages()[1].id, pending.id);
        assert!(transcript.is_awaiting_reply());
    }

    #[test]
    fn reconciling_when_idle_is_an_error() {
        let mut transcript = Transcript::new();
        assert!(transcript.reconcile_success("x", reply("y")).is_err());
        assert_eq!(transcript.messages().len(), 1);
    }

    #[test]
    fn clear_resets_to_greeting_regardless_of_length() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            let pending = transcript.submit(&format!("msg {i}")).unwrap();
            transcript.reconcile_success(&pending.id, reply("ok")).unwrap();
        }
        assert_eq!(transcript.messages().len(), 11);

        transcript.clear();

        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].id, GREETING_ID);
    }

    #[test]
    fn reply_after_clear_lands_in_fresh_transcript() {
        let mut transcript = Transcript::new();
        let pending = transcript.submit("Hello").unwrap();

        transcript.clear();
        assert!(transcript.is_awaiting_reply());

        let settled = transcript
            .reconcile_success(&pending.id, reply("late"))
            .unwrap();

        assert!(settled.user.is_none());
        assert_eq!(transcript.messages().len(), 2);
        assert_eq!(transcript.messages()[1].content, "late");
    }
}
