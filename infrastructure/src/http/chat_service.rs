//! `POST /chat` client.
//!
//! The service takes the whole transcript as `{"messages": [...]}` and
//! answers with the new transcript in the same envelope.

use async_trait::async_trait;
use duck_application::{ChatCompletionService, ServiceUnavailable};
use duck_domain::Turn;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Base address used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const USER_AGENT: &str = concat!("ChatDuck/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Turn],
}

#[derive(Deserialize)]
struct ChatResponse {
    messages: Vec<Turn>,
}

/// [`ChatCompletionService`] backed by the chat HTTP API
pub struct HttpChatService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatCompletionService for HttpChatService {
    async fn complete(&self, transcript: &[Turn]) -> Result<Vec<Turn>, ServiceUnavailable> {
        info!("POST {} ({} turns)", self.endpoint, transcript.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .json(&ChatRequest {
                messages: transcript,
            })
            .send()
            .await
            .map_err(|e| ServiceUnavailable::transport(format!("Failed to reach service: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceUnavailable::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            ServiceUnavailable::transport(format!("Failed to read response body: {}", e))
        })?;
        debug!("Chat service answered with {} bytes", body.len());

        let parsed: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| ServiceUnavailable::malformed(format!("Invalid transcript: {}", e)))?;

        debug!("Received transcript of {} turns", parsed.messages.len());
        Ok(parsed.messages)
    }
}
