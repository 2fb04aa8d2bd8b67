pub mod client;
pub mod error;
pub mod wire;

pub use client::WebhookClient;
pub use error::ExchangeError;
pub use wire::ReplyText;
