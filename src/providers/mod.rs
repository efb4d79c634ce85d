//! Vendor adapters for OpenAI-compatible model providers.
//!
//! An adapter is a strategy object that encodes one vendor's quirks:
//! credential resolution, model naming, the static fallback catalog and the
//! capability table that drives request shaping. Adapters are composed with
//! the shared [`ChatTransport`] through [`VendorClient`] instead of
//! inheriting from a common client.

pub mod kimi;
pub mod zhipu;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog;
use crate::error::LlmError;
use crate::settings::{VendorSettings, resolve_api_key};
use crate::transport::{ChatCompletionResponse, ChatTransport};
use crate::types::{
    CapabilityProfile, EndpointType, ModelCatalogEntry, ModelConfig, ProviderCredentials,
};

/// Conservative context-window floor when a vendor omits `context_length`.
pub const DEFAULT_CONTEXT_WINDOW: u32 = 8192;
/// Catalog default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Baseline inner-thoughts placement when a vendor imposes no rule.
pub const DEFAULT_PUT_INNER_THOUGHTS_IN_KWARGS: bool = true;

/// One row of a vendor's capability table.
///
/// The first row whose marker matches the lowercased model identifier
/// supplies the profile; the vendor default closes the table. Extending a
/// vendor to a new model family means adding a row, not a conditional.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRule {
    /// Lowercase substrings, any of which selects this row.
    pub markers: &'static [&'static str],
    pub profile: CapabilityProfile,
}

/// Vendor-specific behavior behind the shared transport.
#[async_trait]
pub trait VendorAdapter: Send + Sync + std::fmt::Debug {
    fn provider_id(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn default_base_url(&self) -> &'static str;
    fn api_key_env(&self) -> &'static str;
    fn base_url_env(&self) -> &'static str;
    fn settings(&self) -> &VendorSettings;

    /// Identifier prefixes this vendor's models use. Listing entries outside
    /// these prefixes are discarded (shared gateways return foreign models).
    fn model_prefixes(&self) -> &'static [&'static str];

    /// `(model id, context window)` pairs for the guaranteed fallback
    /// catalog.
    fn static_catalog(&self) -> &'static [(&'static str, u32)];

    /// Ordered capability table; evaluated top to bottom.
    fn capability_rules(&self) -> &'static [CapabilityRule];

    fn default_profile(&self) -> CapabilityProfile {
        CapabilityProfile::standard()
    }

    /// Vendor-wide override for inner-thoughts placement. `None` leaves the
    /// caller's default untouched.
    fn inner_thoughts_override(&self) -> Option<bool> {
        None
    }

    /// Capability profile for a model identifier. Pure: same identifier,
    /// same profile, regardless of prior calls.
    fn capability_profile(&self, model: &str) -> CapabilityProfile {
        let id = model.to_ascii_lowercase();
        for rule in self.capability_rules() {
            if rule.markers.iter().any(|marker| id.contains(marker)) {
                return rule.profile;
            }
        }
        self.default_profile()
    }

    fn requires_auto_tool_choice(&self, model: &str) -> bool {
        self.capability_profile(model).requires_auto_tool_choice
    }

    fn supports_structured_output(&self, model: &str) -> bool {
        self.capability_profile(model).supports_structured_output
    }

    /// Whether a listing entry belongs to this vendor.
    fn matches_prefix(&self, model_id: &str) -> bool {
        let id = model_id.to_ascii_lowercase();
        self.model_prefixes()
            .iter()
            .any(|prefix| id.starts_with(prefix))
    }

    /// Stable lookup handle for a model, always `{provider_id}/{model}`.
    /// An already-qualified identifier is stripped to its bare name first.
    fn handle(&self, model: &str) -> String {
        let bare = model.rsplit('/').next().unwrap_or(model);
        format!("{}/{}", self.provider_id(), bare)
    }

    /// Project one raw listing entry into an immutable [`ModelConfig`].
    fn project_entry(&self, entry: &ModelCatalogEntry) -> ModelConfig {
        let profile = self.capability_profile(&entry.id);
        ModelConfig {
            model: entry.id.clone(),
            endpoint_type: EndpointType::OpenAi,
            endpoint: self.settings().base_url.clone(),
            context_window: entry.context_length.unwrap_or(DEFAULT_CONTEXT_WINDOW),
            put_inner_thoughts_in_kwargs: self
                .inner_thoughts_override()
                .unwrap_or(DEFAULT_PUT_INNER_THOUGHTS_IN_KWARGS),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            max_reasoning_tokens: profile.reasoning_token_budget,
            handle: self.handle(&entry.id),
        }
    }

    /// Resolve `{api_key, base_url}` for a call.
    ///
    /// Key precedence: configured settings key, then the vendor's
    /// environment variable, read at call time so rotation needs no restart.
    /// Fails with [`LlmError::ConfigurationError`] before any network I/O
    /// when nothing resolves.
    fn resolve_connection(
        &self,
        endpoint_override: Option<&str>,
    ) -> Result<ProviderCredentials, LlmError> {
        let settings = self.settings();
        let api_key = resolve_api_key(None, settings.api_key.as_ref(), self.api_key_env())
            .ok_or_else(|| {
                LlmError::ConfigurationError(format!(
                    "{} API key is required. Set {} in the environment or configure it in VendorSettings.",
                    self.display_name(),
                    self.api_key_env()
                ))
            })?;
        let base_url = endpoint_override
            .map(str::to_string)
            .or_else(|| settings.base_url.clone())
            .or_else(|| std::env::var(self.base_url_env()).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| self.default_base_url().to_string());
        Ok(ProviderCredentials { api_key, base_url })
    }

    /// [`resolve_connection`](Self::resolve_connection) keyed by a model
    /// configuration's endpoint override.
    fn resolve_credentials(&self, config: &ModelConfig) -> Result<ProviderCredentials, LlmError> {
        self.resolve_connection(config.endpoint.as_deref())
    }

    /// Async variant with identical semantics, for callers already on the
    /// async path.
    async fn resolve_credentials_async(
        &self,
        config: &ModelConfig,
    ) -> Result<ProviderCredentials, LlmError> {
        self.resolve_credentials(config)
    }

    /// Rewrite an outgoing chat-completion payload according to the model's
    /// capability profile.
    ///
    /// Writes `tool_choice` when tools are supplied and the caller did not
    /// pick one; strips `response_format` when the model does not honor
    /// schema-constrained output.
    fn shape_request(&self, params: &mut Value, model: &str) -> Result<(), LlmError> {
        let profile = self.capability_profile(model);
        let Some(obj) = params.as_object_mut() else {
            return Ok(());
        };

        let has_tools = obj
            .get("tools")
            .and_then(Value::as_array)
            .is_some_and(|tools| !tools.is_empty());
        let tool_choice_unset = obj.get("tool_choice").is_none_or(Value::is_null);
        if has_tools && tool_choice_unset {
            obj.insert(
                "tool_choice".to_string(),
                Value::String(profile.tool_choice_policy.as_str().to_string()),
            );
        }

        if !profile.supports_structured_output && obj.contains_key("response_format") {
            obj.remove("response_format");
            tracing::warn!(
                provider = self.provider_id(),
                model,
                "dropped response_format: model does not honor structured output"
            );
        }

        Ok(())
    }
}

/// A vendor adapter composed with the shared transport.
///
/// Cheap to clone; safe to use concurrently. Holds no mutable state: every
/// call resolves its own credentials and recomputes its own capability
/// profile.
#[derive(Debug, Clone)]
pub struct VendorClient {
    adapter: Arc<dyn VendorAdapter>,
    transport: ChatTransport,
}

impl VendorClient {
    pub fn new(adapter: Arc<dyn VendorAdapter>) -> Self {
        Self::with_transport(adapter, ChatTransport::new())
    }

    pub fn with_transport(adapter: Arc<dyn VendorAdapter>, transport: ChatTransport) -> Self {
        Self { adapter, transport }
    }

    pub fn adapter(&self) -> &dyn VendorAdapter {
        self.adapter.as_ref()
    }

    pub fn provider_id(&self) -> &'static str {
        self.adapter.provider_id()
    }

    pub fn resolve_credentials(
        &self,
        config: &ModelConfig,
    ) -> Result<ProviderCredentials, LlmError> {
        self.adapter.resolve_credentials(config)
    }

    /// Live model discovery: authenticated listing, prefix filter,
    /// projection. Fallible; see [`list_models`](Self::list_models) for the
    /// total variant.
    pub async fn discover_models(&self) -> Result<Vec<ModelConfig>, LlmError> {
        catalog::discover_models(self.adapter.as_ref(), &self.transport).await
    }

    /// Model catalog with the static-fallback guarantee: never fails, never
    /// returns an empty list.
    pub async fn list_models(&self) -> Vec<ModelConfig> {
        catalog::list_models(self.adapter.as_ref(), &self.transport).await
    }

    /// Blocking facade over [`list_models`](Self::list_models).
    ///
    /// Drives the async path on a dedicated current-thread runtime. When the
    /// caller is already inside a tokio runtime the work moves to a worker
    /// thread, so the ambient executor keeps running and no nested-runtime
    /// panic occurs.
    pub fn list_models_blocking(&self) -> Vec<ModelConfig> {
        if tokio::runtime::Handle::try_current().is_ok() {
            let client = self.clone();
            std::thread::spawn(move || client.run_catalog_to_completion())
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        } else {
            self.run_catalog_to_completion()
        }
    }

    fn run_catalog_to_completion(&self) -> Vec<ModelConfig> {
        match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(self.list_models()),
            Err(err) => {
                tracing::warn!(
                    provider = self.provider_id(),
                    error = %err,
                    "could not build catalog runtime; serving the static catalog"
                );
                catalog::fallback_models(self.adapter.as_ref())
            }
        }
    }

    /// Shape an outgoing request body for the given model configuration.
    pub fn shape_request(&self, params: &mut Value, config: &ModelConfig) -> Result<(), LlmError> {
        self.adapter.shape_request(params, &config.model)
    }

    /// Resolve credentials, shape the body and send one chat completion.
    pub async fn chat(
        &self,
        config: &ModelConfig,
        mut body: Value,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let credentials = self.adapter.resolve_credentials(config)?;
        {
            let obj = body.as_object_mut().ok_or_else(|| {
                LlmError::ConfigurationError(
                    "chat request body must be a JSON object".to_string(),
                )
            })?;
            obj.entry("model")
                .or_insert_with(|| Value::String(config.model.clone()));
        }
        self.adapter.shape_request(&mut body, &config.model)?;
        self.transport
            .chat_completion(self.adapter.provider_id(), &credentials, &body)
            .await
    }
}

/// Registry of built-in vendor adapters.
///
/// Constructed explicitly by the caller; there is no process-global
/// instance. Custom adapters can be registered beside the built-ins.
pub struct ProviderRegistry {
    adapters: HashMap<&'static str, Arc<dyn VendorAdapter>>,
}

impl ProviderRegistry {
    /// Registry with the built-in vendors, each reading its environment at
    /// call time.
    pub fn new() -> Self {
        let mut registry = Self {
            adapters: HashMap::new(),
        };
        registry.register(Arc::new(kimi::KimiAdapter::new()));
        registry.register(Arc::new(zhipu::ZhipuAdapter::new()));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn VendorAdapter>) {
        self.adapters.insert(adapter.provider_id(), adapter);
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn VendorAdapter>> {
        self.adapters.get(provider_id).cloned()
    }

    pub fn list_providers(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.adapters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Client for a provider id, or a configuration error naming it.
    pub fn create_client(&self, provider_id: &str) -> Result<VendorClient, LlmError> {
        let adapter = self.get(provider_id).ok_or_else(|| {
            LlmError::ConfigurationError(format!("Unknown provider: {provider_id}"))
        })?;
        Ok(VendorClient::new(adapter))
    }

    /// Client for a `provider/model` handle.
    pub fn create_client_for_handle(&self, handle: &str) -> Result<VendorClient, LlmError> {
        let (provider_id, _) = crate::types::parse_handle(handle).ok_or_else(|| {
            LlmError::ConfigurationError(format!(
                "Invalid model handle (expected provider/model): {handle}"
            ))
        })?;
        self.create_client(provider_id)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
