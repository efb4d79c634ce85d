//! Kimi (Moonshot AI) vendor adapter.
//!
//! Kimi's API is OpenAI-compatible. The K2 generation and the thinking
//! variants drive tool calling differently from the classic `moonshot-v1`
//! line: they pick their own tools (`tool_choice: auto`), honor
//! schema-constrained output and carry a reasoning-token budget. Across the
//! whole vendor, private reasoning must not be requested inline in
//! function-call arguments.

use crate::providers::{CapabilityRule, VendorAdapter};
use crate::settings::VendorSettings;
use crate::types::{CapabilityProfile, ToolChoicePolicy};

/// Kimi model constants.
pub mod models {
    pub const MOONSHOT_V1_8K: &str = "moonshot-v1-8k";
    pub const MOONSHOT_V1_32K: &str = "moonshot-v1-32k";
    pub const MOONSHOT_V1_128K: &str = "moonshot-v1-128k";
    /// K2 flagship, 256K context.
    pub const KIMI_K2_0905_PREVIEW: &str = "kimi-k2-0905-preview";
    /// K2, 128K context.
    pub const KIMI_K2_0711_PREVIEW: &str = "kimi-k2-0711-preview";
    /// K2 low-latency variant, 256K context.
    pub const KIMI_K2_TURBO_PREVIEW: &str = "kimi-k2-turbo-preview";
}

pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn/v1";

/// Published context windows, used when live discovery is unavailable.
const STATIC_CATALOG: &[(&str, u32)] = &[
    (models::MOONSHOT_V1_8K, 8192),
    (models::MOONSHOT_V1_32K, 32768),
    (models::MOONSHOT_V1_128K, 131072),
    (models::KIMI_K2_0905_PREVIEW, 262144),
    (models::KIMI_K2_0711_PREVIEW, 131072),
    (models::KIMI_K2_TURBO_PREVIEW, 262144),
];

const CAPABILITY_RULES: &[CapabilityRule] = &[
    // K2 / thinking generation: reasoning-capable, picks its own tools.
    CapabilityRule {
        markers: &["k2", "thinking"],
        profile: CapabilityProfile {
            requires_auto_tool_choice: true,
            supports_structured_output: true,
            tool_choice_policy: ToolChoicePolicy::Auto,
            reasoning_token_budget: 1024,
        },
    },
];

/// Adapter for the Kimi (Moonshot AI) OpenAI-compatible API.
#[derive(Debug, Clone, Default)]
pub struct KimiAdapter {
    settings: VendorSettings,
}

impl KimiAdapter {
    /// Adapter reading `KIMI_API_KEY` / `KIMI_BASE_URL` at call time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter with explicit settings; the environment remains the fallback
    /// tier.
    pub fn with_settings(settings: VendorSettings) -> Self {
        Self { settings }
    }
}

impl VendorAdapter for KimiAdapter {
    fn provider_id(&self) -> &'static str {
        "kimi"
    }

    fn display_name(&self) -> &'static str {
        "Kimi (Moonshot AI)"
    }

    fn default_base_url(&self) -> &'static str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> &'static str {
        "KIMI_API_KEY"
    }

    fn base_url_env(&self) -> &'static str {
        "KIMI_BASE_URL"
    }

    fn settings(&self) -> &VendorSettings {
        &self.settings
    }

    fn model_prefixes(&self) -> &'static [&'static str] {
        &["moonshot-", "kimi-"]
    }

    fn static_catalog(&self) -> &'static [(&'static str, u32)] {
        STATIC_CATALOG
    }

    fn capability_rules(&self) -> &'static [CapabilityRule] {
        CAPABILITY_RULES
    }

    // Kimi's tool-calling contract has no separate channel for private
    // reasoning, so it must never be requested inline.
    fn inner_thoughts_override(&self) -> Option<bool> {
        Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelCatalogEntry;
    use serde_json::json;

    #[test]
    fn k2_models_are_reasoning_variants() {
        let adapter = KimiAdapter::new();
        let profile = adapter.capability_profile(models::KIMI_K2_0905_PREVIEW);
        assert!(profile.requires_auto_tool_choice);
        assert!(profile.supports_structured_output);
        assert_eq!(profile.tool_choice_policy, ToolChoicePolicy::Auto);
        assert_eq!(profile.reasoning_token_budget, 1024);
    }

    #[test]
    fn classic_moonshot_models_use_the_base_profile() {
        let adapter = KimiAdapter::new();
        let profile = adapter.capability_profile(models::MOONSHOT_V1_8K);
        assert!(!profile.requires_auto_tool_choice);
        assert!(!profile.supports_structured_output);
        assert_eq!(profile.tool_choice_policy, ToolChoicePolicy::Required);
        assert_eq!(profile.reasoning_token_budget, 0);
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        let adapter = KimiAdapter::new();
        assert!(adapter.requires_auto_tool_choice("Kimi-K2-0905-Preview"));
        assert!(adapter.requires_auto_tool_choice("kimi-thinking-preview"));
        assert!(!adapter.requires_auto_tool_choice("moonshot-v1-32k"));
    }

    #[test]
    fn inner_thoughts_are_forced_off_vendor_wide() {
        let adapter = KimiAdapter::new();
        for (id, context_window) in STATIC_CATALOG {
            let config = adapter.project_entry(&ModelCatalogEntry {
                id: (*id).to_string(),
                context_length: Some(*context_window),
            });
            assert!(!config.put_inner_thoughts_in_kwargs, "{id}");
        }
    }

    #[test]
    fn projection_carries_reasoning_budget_into_config() {
        let adapter = KimiAdapter::new();
        let config = adapter.project_entry(&ModelCatalogEntry {
            id: models::KIMI_K2_0905_PREVIEW.to_string(),
            context_length: Some(262144),
        });
        assert_eq!(config.max_reasoning_tokens, 1024);
        assert_eq!(config.context_window, 262144);
        assert_eq!(config.handle, "kimi/kimi-k2-0905-preview");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, None);
    }

    #[test]
    fn static_catalog_has_six_models() {
        let adapter = KimiAdapter::new();
        assert_eq!(adapter.static_catalog().len(), 6);
        assert!(
            adapter
                .static_catalog()
                .iter()
                .all(|(id, _)| adapter.matches_prefix(id))
        );
    }

    #[test]
    fn shaping_forces_required_tool_choice_for_classic_models() {
        let adapter = KimiAdapter::new();
        let mut params = json!({
            "model": models::MOONSHOT_V1_8K,
            "tools": [{"type": "function", "function": {"name": "send_message"}}]
        });
        adapter
            .shape_request(&mut params, models::MOONSHOT_V1_8K)
            .expect("shape");
        assert_eq!(params["tool_choice"], "required");
    }

    #[test]
    fn shaping_lets_k2_models_pick_their_own_tools() {
        let adapter = KimiAdapter::new();
        let mut params = json!({
            "model": models::KIMI_K2_0905_PREVIEW,
            "tools": [{"type": "function", "function": {"name": "send_message"}}]
        });
        adapter
            .shape_request(&mut params, models::KIMI_K2_0905_PREVIEW)
            .expect("shape");
        assert_eq!(params["tool_choice"], "auto");
    }
}
