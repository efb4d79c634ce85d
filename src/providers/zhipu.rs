//! Zhipu AI (GLM) vendor adapter.
//!
//! Zhipu's open platform speaks the OpenAI-compatible dialect. The GLM-4
//! generation onward negotiates tool calling itself and honors
//! schema-constrained output; only the GLM-5 / thinking releases are
//! reasoning variants with a token budget and `tool_choice: auto`. Unlike
//! Kimi, Zhipu imposes no vendor-wide rule on inner-thoughts placement.

use crate::providers::{CapabilityRule, VendorAdapter};
use crate::settings::VendorSettings;
use crate::types::{CapabilityProfile, ToolChoicePolicy};

/// Zhipu model constants.
pub mod models {
    pub const GLM_4_PLUS: &str = "glm-4-plus";
    pub const GLM_4_0520: &str = "glm-4-0520";
    pub const GLM_4: &str = "glm-4";
    pub const GLM_4_AIR: &str = "glm-4-air";
    pub const GLM_4_AIRX: &str = "glm-4-airx";
    /// 1M context window.
    pub const GLM_4_LONG: &str = "glm-4-long";
    pub const GLM_4_FLASH: &str = "glm-4-flash";
    pub const GLM_4_FLASHX: &str = "glm-4-flashx";
    pub const GLM_5: &str = "glm-5";
}

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Published context windows, used when live discovery is unavailable.
const STATIC_CATALOG: &[(&str, u32)] = &[
    (models::GLM_4_PLUS, 128000),
    (models::GLM_4_0520, 128000),
    (models::GLM_4, 128000),
    (models::GLM_4_AIR, 128000),
    (models::GLM_4_AIRX, 128000),
    (models::GLM_4_LONG, 1000000),
    (models::GLM_4_FLASH, 128000),
    (models::GLM_4_FLASHX, 128000),
    (models::GLM_5, 128000),
];

const CAPABILITY_RULES: &[CapabilityRule] = &[
    // GLM-5 / GLM-4.5 / thinking releases: reasoning variants.
    CapabilityRule {
        markers: &["glm-5", "glm-4.5", "thinking"],
        profile: CapabilityProfile {
            requires_auto_tool_choice: true,
            supports_structured_output: true,
            tool_choice_policy: ToolChoicePolicy::Auto,
            reasoning_token_budget: 1024,
        },
    },
    // GLM-4 generation: negotiates tools and structured output, but still
    // gets tool calls forced when tools are offered.
    CapabilityRule {
        markers: &["glm-4"],
        profile: CapabilityProfile {
            requires_auto_tool_choice: true,
            supports_structured_output: true,
            tool_choice_policy: ToolChoicePolicy::Required,
            reasoning_token_budget: 0,
        },
    },
];

/// Adapter for the Zhipu AI OpenAI-compatible API.
#[derive(Debug, Clone, Default)]
pub struct ZhipuAdapter {
    settings: VendorSettings,
}

impl ZhipuAdapter {
    /// Adapter reading `ZHIPU_API_KEY` / `ZHIPU_BASE_URL` at call time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter with explicit settings; the environment remains the fallback
    /// tier.
    pub fn with_settings(settings: VendorSettings) -> Self {
        Self { settings }
    }
}

impl VendorAdapter for ZhipuAdapter {
    fn provider_id(&self) -> &'static str {
        "zhipu"
    }

    fn display_name(&self) -> &'static str {
        "Zhipu AI"
    }

    fn default_base_url(&self) -> &'static str {
        DEFAULT_BASE_URL
    }

    fn api_key_env(&self) -> &'static str {
        "ZHIPU_API_KEY"
    }

    fn base_url_env(&self) -> &'static str {
        "ZHIPU_BASE_URL"
    }

    fn settings(&self) -> &VendorSettings {
        &self.settings
    }

    fn model_prefixes(&self) -> &'static [&'static str] {
        &["glm-"]
    }

    fn static_catalog(&self) -> &'static [(&'static str, u32)] {
        STATIC_CATALOG
    }

    fn capability_rules(&self) -> &'static [CapabilityRule] {
        CAPABILITY_RULES
    }
}
