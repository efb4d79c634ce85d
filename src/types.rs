//! Core data model: model configurations, credentials and capability
//! profiles.
//!
//! Everything here is immutable by convention: values are produced by the
//! catalog resolver or computed per call, and callers derive new values via
//! the `with_*` methods instead of mutating in place.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Wire dialect spoken by a vendor endpoint. Both supported vendors expose
/// the OpenAI-compatible chat-completion dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    OpenAi,
}

/// Immutable description of one vendor model to use for a call.
///
/// Constructed by the catalog resolver at listing time; never mutated after
/// creation. Per-call overrides produce a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Vendor model identifier, e.g. `kimi-k2-0905-preview`.
    pub model: String,
    pub endpoint_type: EndpointType,
    /// Explicit endpoint override; `None` falls back to the vendor's
    /// configured or default base URL.
    pub endpoint: Option<String>,
    /// Context window size in tokens.
    pub context_window: u32,
    /// Whether the model's private reasoning should be embedded in
    /// function-call arguments instead of a dedicated channel.
    pub put_inner_thoughts_in_kwargs: bool,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Reasoning-token budget; 0 disables extended reasoning.
    pub max_reasoning_tokens: u32,
    /// Stable lookup key, always `{provider_id}/{model}`.
    pub handle: String,
}

impl ModelConfig {
    /// New value with a different sampling temperature.
    pub fn with_temperature(&self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self.clone()
        }
    }

    /// New value with an explicit endpoint override.
    pub fn with_endpoint(&self, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..self.clone()
        }
    }

    /// New value with a different output-token cap.
    pub fn with_max_tokens(&self, max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..self.clone()
        }
    }

    /// New value with the inner-thoughts placement flag overridden.
    pub fn with_put_inner_thoughts_in_kwargs(&self, value: bool) -> Self {
        Self {
            put_inner_thoughts_in_kwargs: value,
            ..self.clone()
        }
    }
}

/// Split a `provider/model` handle into its two components.
pub fn parse_handle(handle: &str) -> Option<(&str, &str)> {
    handle
        .split_once('/')
        .filter(|(provider, model)| !provider.is_empty() && !model.is_empty())
}

/// Connection parameters for one outgoing call.
///
/// Computed fresh on every call and never cached, so key rotation takes
/// effect immediately.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub api_key: SecretString,
    pub base_url: String,
}

/// Raw record returned by a vendor's model-listing endpoint. Transient:
/// filtered and projected into [`ModelConfig`], then discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCatalogEntry {
    pub id: String,
    #[serde(default)]
    pub context_length: Option<u32>,
}

/// Tool-choice strategy written into an outgoing request when tools are
/// supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoicePolicy {
    /// Let the model decide whether to call a tool.
    Auto,
    /// Force the model to call a tool instead of emitting free text.
    Required,
}

impl ToolChoicePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Required => "required",
        }
    }
}

/// Request-shaping flags derived from a model identifier.
///
/// A pure function of the identifier: cheap to recompute per request and
/// never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub requires_auto_tool_choice: bool,
    pub supports_structured_output: bool,
    pub tool_choice_policy: ToolChoicePolicy,
    pub reasoning_token_budget: u32,
}

impl CapabilityProfile {
    /// Baseline profile for models without a generation or reasoning marker.
    pub const fn standard() -> Self {
        Self {
            requires_auto_tool_choice: false,
            supports_structured_output: false,
            tool_choice_policy: ToolChoicePolicy::Required,
            reasoning_token_budget: 0,
        }
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::standard()
    }
}
