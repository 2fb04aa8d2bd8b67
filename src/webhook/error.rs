use thiserror::Error;

pub const NETWORK_OR_CORS_HINT: &str = "Network error or CORS block. Ensure the webhook endpoint is active and listening, and that it accepts cross-origin requests.";

/// Everything that can go wrong during one exchange. Only developer-facing
/// diagnostics see these details; the transcript shows a fixed apology.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Status {status_code}: {body_text}")]
    RemoteRejected { status_code: u16, body_text: String },

    #[error("{hint} ({source})")]
    NetworkOrCors {
        hint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Unknown(String),
}

impl ExchangeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::RemoteRejected { .. } => "remote_rejected",
            ExchangeError::NetworkOrCors { .. } => "network_or_cors",
            ExchangeError::Unknown(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ExchangeError::NetworkOrCors {
                hint: NETWORK_OR_CORS_HINT,
                source: e,
            }
        } else {
            ExchangeError::Unknown(e.to_string())
        }
    }
}
