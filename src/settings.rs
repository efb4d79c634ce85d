//! Per-vendor connection settings and credential resolution.
//!
//! Settings are plain values handed to an adapter at construction time; there
//! is no process-wide singleton. Environment fallback happens inside
//! [`resolve_api_key`] at call time, so rotating a key in the environment
//! takes effect without rebuilding the adapter.

use secrecy::{ExposeSecret, SecretString};

/// Configured connection parameters for one vendor.
///
/// Both fields are optional: a missing `api_key` falls back to the vendor's
/// environment variable, a missing `base_url` falls back to the vendor's
/// published default endpoint.
#[derive(Debug, Clone, Default)]
pub struct VendorSettings {
    /// Process-wide configured API key.
    pub api_key: Option<SecretString>,
    /// Process-wide configured base URL override.
    pub base_url: Option<String>,
}

impl VendorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the vendor's environment variables into explicit settings.
    pub fn from_env(api_key_var: &str, base_url_var: &str) -> Self {
        Self {
            api_key: non_empty(std::env::var(api_key_var).ok()).map(SecretString::from),
            base_url: non_empty(std::env::var(base_url_var).ok()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Resolve an API key with the fixed precedence: explicit per-call key, then
/// configured settings key, then the vendor's environment variable.
///
/// Empty strings count as absent at every tier. Returns `None` when nothing
/// resolves; the caller is responsible for raising the configuration error
/// before any network I/O happens.
pub fn resolve_api_key(
    explicit: Option<&SecretString>,
    configured: Option<&SecretString>,
    env_var: &str,
) -> Option<SecretString> {
    explicit
        .filter(|key| !key.expose_secret().is_empty())
        .or(configured.filter(|key| !key.expose_secret().is_empty()))
        .cloned()
        .or_else(|| non_empty(std::env::var(env_var).ok()).map(SecretString::from))
}

/// Redacted rendering of an API key for logs and diagnostics: a short prefix
/// plus the length, never the key itself.
pub fn redact_key(key: &SecretString) -> String {
    let exposed = key.expose_secret();
    if exposed.len() <= 8 {
        format!("...({} chars)", exposed.len())
    } else {
        let prefix: String = exposed.chars().take(5).collect();
        format!("{prefix}...({} chars)", exposed.len())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
