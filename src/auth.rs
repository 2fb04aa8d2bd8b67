use crate::entity::Identity;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1200);

/// Stand-in for the Google sign-in: always yields the same profile after a
/// short simulated round trip.
#[derive(Debug, Clone)]
pub struct MockLogin {
    delay: Duration,
    identity: Identity,
}

impl Default for MockLogin {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_DELAY)
    }
}

impl MockLogin {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            identity: Identity::mock(),
        }
    }

    pub async fn login(&self) -> Identity {
        info!("Authenticating with mock provider...");
        tokio::time::sleep(self.delay).await;
        self.identity.clone()
    }
}
