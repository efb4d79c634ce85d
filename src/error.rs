//! Error types for the vendor adapter layer.
//!
//! All failures surface as [`LlmError`]. Every variant carries a stable
//! machine-readable [`kind`](LlmError::kind) plus a human-readable message;
//! HTTP-backed variants keep the original status code and raw body so callers
//! can log them. API keys never appear in error messages.

use thiserror::Error;

/// Unified error type for credential resolution, model discovery and
/// chat-completion transport.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or invalid local configuration. Raised before any network
    /// call is attempted.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// HTTP 401 from a vendor: the API key is invalid or expired.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP 403 from a vendor: the key is valid but lacks permission for the
    /// requested endpoint.
    #[error("Permission denied: {0}")]
    PermissionError(String),

    /// The request did not complete within the transport timeout.
    #[error("Request timed out: {0}")]
    TimeoutError(String),

    /// Transport-level failure below the HTTP status layer (DNS, TLS,
    /// connection reset).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A response arrived but its body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Any other non-2xx vendor response. Carries the status and the raw
    /// body for upstream diagnostics.
    #[error("{provider} API error (status {status}): {message}")]
    VendorError {
        provider: String,
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },
}

impl LlmError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "configuration",
            Self::AuthenticationError(_) => "authentication",
            Self::PermissionError(_) => "permission",
            Self::TimeoutError(_) => "timeout",
            Self::HttpError(_) => "http",
            Self::ParseError(_) => "parse",
            Self::VendorError { .. } => "vendor",
        }
    }

    /// HTTP status code associated with this error, when one exists.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationError(_) => Some(401),
            Self::PermissionError(_) => Some(403),
            Self::VendorError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body associated with this error, when one was preserved.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::VendorError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Build a [`LlmError::VendorError`] from a raw response body, preferring
    /// the message inside the OpenAI-style error envelope when present.
    pub fn vendor_error(provider: &str, status: u16, body_text: &str) -> Self {
        let body: Option<serde_json::Value> = serde_json::from_str(body_text).ok();
        let message = body
            .as_ref()
            .and_then(envelope_message)
            .unwrap_or_else(|| truncated(body_text));
        Self::VendorError {
            provider: provider.to_string(),
            status,
            message,
            body,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

/// Classify a non-2xx vendor HTTP response into the shared taxonomy.
///
/// 401 and 403 get dedicated variants; everything else becomes a
/// [`LlmError::VendorError`] carrying the status and raw body. Timeouts are
/// classified by the `From<reqwest::Error>` conversion, not here.
pub fn classify_http_error(provider: &str, status: u16, body_text: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationError(format!(
            "{provider} rejected the API key (invalid or expired)"
        )),
        403 => LlmError::PermissionError(format!(
            "{provider} API key lacks permission for this endpoint"
        )),
        _ => LlmError::vendor_error(provider, status, body_text),
    }
}

/// Extract the message from an OpenAI-style `{"error": {"message": ...}}`
/// envelope.
fn envelope_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn truncated(text: &str) -> String {
    const LIMIT: usize = 200;
    if text.len() <= LIMIT {
        text.to_string()
    } else {
        let end = (0..=LIMIT).rev().find(|i| text.is_char_boundary(*i));
        format!("{}...", &text[..end.unwrap_or(0)])
    }
}
