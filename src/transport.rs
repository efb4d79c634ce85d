//! Shared OpenAI-compatible HTTP transport.
//!
//! Both vendors speak the same wire dialect, so the transport is a single
//! component that vendor adapters are composed with. It owns the HTTP client
//! and the per-request timeout, attaches bearer credentials, and routes
//! non-2xx responses through the error classifier. It never logs request or
//! response bodies; only statuses and counts.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, classify_http_error};
use crate::types::{ModelCatalogEntry, ProviderCredentials};

/// Default bound for a single vendor request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport shared by all vendor adapters.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl Default for ChatTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Reuse an externally configured client (proxy, connection pool).
    pub fn with_http_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Authenticated `GET {base_url}/models`.
    ///
    /// Returns the vendor's raw catalog entries; the caller filters and
    /// projects them. 401/403/timeout/other failures surface as the matching
    /// [`LlmError`] variants.
    pub async fn list_models(
        &self,
        provider: &str,
        credentials: &ProviderCredentials,
    ) -> Result<Vec<ModelCatalogEntry>, LlmError> {
        let url = endpoint_url(&credentials.base_url, "models");
        let response = self
            .http
            .get(&url)
            .bearer_auth(credentials.api_key.expose_secret())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(provider, status.as_u16(), &body));
        }

        let text = response.text().await?;
        let listing: ModelListingResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::ParseError(format!("{provider} model listing did not decode: {e}"))
        })?;
        tracing::debug!(
            provider,
            models = listing.data.len(),
            "fetched live model listing"
        );
        Ok(listing.data)
    }

    /// Authenticated `POST {base_url}/chat/completions`.
    ///
    /// The body is sent as shaped by the adapter; this layer adds nothing
    /// beyond credentials and the timeout bound.
    pub async fn chat_completion(
        &self,
        provider: &str,
        credentials: &ProviderCredentials,
        body: &serde_json::Value,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = endpoint_url(&credentials.base_url, "chat/completions");
        let response = self
            .http
            .post(&url)
            .bearer_auth(credentials.api_key.expose_secret())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(provider, status.as_u16(), &body));
        }

        let text = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::ParseError(format!("{provider} chat completion did not decode: {e}"))
        })?;
        tracing::debug!(
            provider,
            status = status.as_u16(),
            choices = completion.choices.len(),
            "chat completion succeeded"
        );
        Ok(completion)
    }
}

fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

#[derive(Debug, Deserialize)]
struct ModelListingResponse {
    #[serde(default)]
    data: Vec<ModelCatalogEntry>,
}

/// Standard chat-completion response shape shared by both vendors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub created: Option<u64>,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ChatToolCall>>,
    /// Reasoning channel used by both vendors' thinking-capable models.
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub function: Option<ChatFunctionCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}
