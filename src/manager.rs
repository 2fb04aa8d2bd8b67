use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use crate::bus::{Event, EventBus};
use crate::chat::ChatMessage;
use crate::entity::Identity;
use crate::session::SessionStore;
use crate::transcript::Transcript;
use crate::webhook::WebhookClient;

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank text, or another exchange is still outstanding.
    Rejected,
    Replied(ChatMessage),
    /// The exchange failed; carries the apology appended to the transcript.
    Failed(ChatMessage),
    /// The reply arrived after its transcript was discarded (sign-out).
    Discarded,
}

/// Owns the current identity and transcript and drives the
/// submit, exchange, reconcile pipeline. Renderers observe it through the bus.
pub struct Manager {
    store: Arc<dyn SessionStore>,
    client: WebhookClient,
    event_bus: Arc<EventBus>,
    identity: Mutex<Option<Identity>>,
    transcript: Mutex<Transcript>,
}

impl Manager {
    pub fn new(store: Arc<dyn SessionStore>, client: WebhookClient, event_bus: Arc<EventBus>) -> Self {
        Self {
            store,
            client,
            event_bus,
            identity: Mutex::new(None),
            transcript: Mutex::new(Transcript::new()),
        }
    }

    /// Picks up the identity persisted by a previous run, if any.
    pub async fn restore_session(&self) -> Result<Option<Identity>> {
        let identity = self.store.load().await?;
        if let Some(identity) = &identity {
            info!("Restored session for {}", identity);
            *self.identity() = Some(identity.clone());
            self.event_bus.publish(Event::SignedIn(identity.clone()));
        }
        Ok(identity)
    }

    pub async fn sign_in(&self, identity: Identity) -> Result<()> {
        self.store.save(&identity).await?;
        info!("Signed in as {}", identity);

        *self.identity() = Some(identity.clone());
        *self.transcript() = Transcript::new();
        self.event_bus.publish(Event::SignedIn(identity));
        Ok(())
    }

    /// Forgets the identity and drops the transcript; a reply still in flight
    /// is discarded when it arrives.
    pub async fn sign_out(&self) -> Result<()> {
        self.store.clear().await?;
        info!("Signed out");

        *self.identity() = None;
        *self.transcript() = Transcript::new();
        self.event_bus.publish(Event::SignedOut);
        Ok(())
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript().messages().to_vec()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.transcript().is_awaiting_reply()
    }

    pub fn clear_chat(&self) {
        let greeting = {
            let mut transcript = self.transcript();
            transcript.clear();
            transcript.messages()[0].clone()
        };
        self.event_bus.publish(Event::TranscriptReset(greeting));
    }

    /// Sends one message through the webhook. Every exchange error is logged
    /// here and turned into the fixed apology in the transcript.
    pub async fn send(&self, text: &str) -> Result<SendOutcome> {
        let identity = self.current_identity().context("Not signed in")?;

        let pending = self.transcript().submit(text);
        let Some(pending) = pending else {
            debug!("Submission rejected (blank or awaiting reply)");
            return Ok(SendOutcome::Rejected);
        };

        self.event_bus.publish(Event::MessageAppended(pending.clone()));
        self.event_bus.publish(Event::AwaitingReply(true));

        let result = self.client.send(&pending.content, &identity).await;

        let settled = {
            let mut transcript = self.transcript();
            match &result {
                Ok(reply) => transcript.reconcile_success(&pending.id, reply.clone()),
                Err(e) => {
                    error!("Webhook exchange failed ({}): {}", e.kind(), e);
                    transcript.reconcile_failure(&pending.id)
                }
            }
        };

        let settled = match settled {
            Ok(settled) => settled,
            Err(e) => {
                debug!("Discarding reply: {}", e);
                return Ok(SendOutcome::Discarded);
            }
        };

        if let Some(user) = settled.user {
            self.event_bus.publish(Event::MessageUpdated(user));
        }
        self.event_bus
            .publish(Event::MessageAppended(settled.reply.clone()));
        self.event_bus.publish(Event::AwaitingReply(false));

        Ok(match result {
            Ok(_) => SendOutcome::Replied(settled.reply),
            Err(_) => SendOutcome::Failed(settled.reply),
        })
    }

    fn identity(&self) -> MutexGuard<'_, Option<Identity>> {
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
