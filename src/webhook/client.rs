use crate::entity::Identity;
use crate::webhook::error::ExchangeError;
use crate::webhook::wire::{ReplyText, WebhookReply, WebhookRequest, WebhookResponse};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    /// No request timeout is configured; the transport's own limits apply.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// One request/response cycle against the webhook.
    pub async fn send(&self, text: &str, identity: &Identity) -> Result<ReplyText, ExchangeError> {
        let reply = self.exchange(text, identity).await?;
        debug!(
            "<- Webhook reply (status {}): {:?}",
            reply.status().unwrap_or("-"),
            reply
        );
        Ok(reply.into_reply_text())
    }

    async fn exchange(&self, text: &str, identity: &Identity) -> Result<WebhookReply, ExchangeError> {
        let request = WebhookRequest::new(text, identity);
        debug!("-> Posting to webhook {}: {:?}", self.url, request);

        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = match response.text().await {
                Ok(body) if body.is_empty() => status.canonical_reason().unwrap_or_default().to_string(),
                Ok(body) => body,
                Err(_) => "Unknown error".to_string(),
            };
            return Err(ExchangeError::RemoteRejected {
                status_code: status.as_u16(),
                body_text,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if is_json {
            let body = response.text().await?;
            let value: Value = serde_json::from_str(&body)
                .map_err(|e| ExchangeError::Unknown(format!("Failed to parse webhook response: {}", e)))?;
            Ok(WebhookReply::Json(WebhookResponse::from_value(&value)))
        } else {
            Ok(WebhookReply::plain_text(response.text().await?))
        }
    }
}
