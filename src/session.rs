use crate::entity::Identity;
use crate::store::Store;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

pub const SESSION_KEY: &str = "nova_chat_user";

/// Remembers at most one signed-in identity across restarts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Corrupted data reads as no session.
    async fn load(&self) -> Result<Option<Identity>>;
    async fn save(&self, identity: &Identity) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[async_trait]
impl SessionStore for Store {
    async fn load(&self) -> Result<Option<Identity>> {
        let Some(raw) = self.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                warn!("Failed to parse saved user, ignoring it: {}", e);
                Ok(None)
            }
        }
    }

    async fn save(&self, identity: &Identity) -> Result<()> {
        let raw = serde_json::to_string(identity).context("Failed to serialize identity")?;
        self.set(SESSION_KEY, &raw).await
    }

    async fn clear(&self) -> Result<()> {
        self.remove(SESSION_KEY).await
    }
}
