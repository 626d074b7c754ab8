//! Anthropic Messages API client.
//!
//! One request per turn, no streaming. No timeout is set on the call;
//! the host panel blocks on the reply by design.

use crate::infrastructure::ai::types::{
    ApiError, ChatMessage, MessagesRequest, MessagesResponse,
};
use crate::service::config::Config;
use crate::util::errors::{CadPilotError, CadPilotResult};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Seam between the chat layer and the model provider.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// One request, one reply: the first text block of the model output.
    async fn complete(&self, system: &str, user: &str) -> CadPilotResult<String>;
}

pub struct AnthropicClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.settings.base_url.clone(),
            config.api_key.clone(),
            config.settings.model.clone(),
            config.settings.max_tokens,
        )
    }
}

#[async_trait]
impl ModelGateway for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> CadPilotResult<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.to_string(),
            messages: vec![ChatMessage::user(user)],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| CadPilotError::AiClient(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CadPilotError::AiClient(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| String::from(e.error))
                .unwrap_or_else(|_| format!("HTTP {}", status));
            warn!("Model call failed: {}", detail);
            return Err(CadPilotError::AiClient(detail));
        }

        let reply: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            CadPilotError::AiClient(format!("malformed provider response: {}", e))
        })?;

        if let Some(usage) = &reply.usage {
            debug!(
                "Model call done: {} tokens in, {} tokens out",
                usage.input_tokens.unwrap_or(0),
                usage.output_tokens.unwrap_or(0)
            );
        }

        reply
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| CadPilotError::AiClient("reply contained no text block".to_string()))
    }
}
