use crate::chat::ChatMessage;
use crate::entity::Identity;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A message was appended to the transcript
    MessageAppended(ChatMessage),

    /// An existing message changed status
    MessageUpdated(ChatMessage),

    /// The transcript was reset to its greeting
    TranscriptReset(ChatMessage),

    /// An exchange started or settled
    AwaitingReply(bool),

    SignedIn(Identity),

    SignedOut,
}

pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: Event) {
        // We ignore the error if there are no receivers
        let _ = self.tx.send(event);
    }
}
