//! # Modelgate - Vendor Adapters for OpenAI-Compatible LLM Providers
//!
//! Modelgate adapts a generic chat-completion transport to vendor-specific
//! quirks. It resolves credentials and endpoints, discovers model catalogs
//! (live, with a guaranteed static fallback), negotiates per-model request
//! shaping (tool choice, structured output, reasoning budgets), and maps
//! vendor HTTP failures into a typed error taxonomy.
//!
//! Supported vendors: Kimi (Moonshot AI) and Zhipu AI (GLM).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelgate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads KIMI_API_KEY / KIMI_BASE_URL from the environment.
//!     let client = VendorClient::new(std::sync::Arc::new(KimiAdapter::new()));
//!
//!     // Never fails: falls back to the static catalog when the live
//!     // listing endpoint is unreachable.
//!     let models = client.list_models().await;
//!     for model in &models {
//!         println!("{} ({} tokens)", model.handle, model.context_window);
//!     }
//!
//!     let response = client
//!         .chat(&models[0], serde_json::json!({
//!             "messages": [{"role": "user", "content": "Hello!"}]
//!         }))
//!         .await?;
//!     println!("{:?}", response.choices[0].message.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Composition over inheritance**: vendor behavior lives in
//!   [`providers::VendorAdapter`] strategy objects injected into the shared
//!   [`transport::ChatTransport`]; there is no client subclassing.
//! - **No ambient state**: settings are explicit values, credentials are
//!   resolved fresh per call (environment fallback included), capability
//!   profiles are pure functions of the model identifier. Everything is
//!   `Clone` and safe to use concurrently.
//! - **Typed failures**: see [`error::LlmError`]. API keys never appear in
//!   errors or logs.

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod providers;
pub mod settings;
pub mod transport;
pub mod types;

pub use error::LlmError;

/// Common imports for working with modelgate.
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::kimi::KimiAdapter;
    pub use crate::providers::zhipu::ZhipuAdapter;
    pub use crate::providers::{ProviderRegistry, VendorAdapter, VendorClient};
    pub use crate::settings::VendorSettings;
    pub use crate::transport::ChatTransport;
    pub use crate::types::{
        CapabilityProfile, EndpointType, ModelConfig, ProviderCredentials, ToolChoicePolicy,
    };
}
