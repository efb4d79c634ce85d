//! Model catalog resolution: live discovery with a static fallback.
//!
//! Live discovery keeps the catalog current as vendors ship new model
//! variants; the static catalog guarantees the adapter keeps functioning when
//! the discovery endpoint is unreachable, rate limited, or the key lacks
//! list permission. The fallback path performs no I/O and never fails.

use crate::error::LlmError;
use crate::providers::VendorAdapter;
use crate::transport::ChatTransport;
use crate::types::{ModelCatalogEntry, ModelConfig};

/// Live discovery: authenticated listing, prefix filter, projection.
///
/// Fails typed on missing credentials, 401/403, timeout or any other vendor
/// error. An empty result after filtering is not an error here; the caller
/// treats it as a fallback trigger.
pub async fn discover_models(
    adapter: &dyn VendorAdapter,
    transport: &ChatTransport,
) -> Result<Vec<ModelConfig>, LlmError> {
    let credentials = adapter.resolve_connection(None)?;
    let entries = transport
        .list_models(adapter.provider_id(), &credentials)
        .await?;
    let total = entries.len();
    let models = project_entries(adapter, &entries);
    tracing::debug!(
        provider = adapter.provider_id(),
        listed = total,
        retained = models.len(),
        "projected live model listing"
    );
    Ok(models)
}

/// Filter raw entries by the vendor's naming prefixes and project the
/// survivors. A shared gateway may list other vendors' models on the same
/// endpoint; those are discarded.
pub fn project_entries(
    adapter: &dyn VendorAdapter,
    entries: &[ModelCatalogEntry],
) -> Vec<ModelConfig> {
    entries
        .iter()
        .filter(|entry| adapter.matches_prefix(&entry.id))
        .map(|entry| adapter.project_entry(entry))
        .collect()
}

/// Project the vendor's static catalog. Terminal path: no I/O, never fails,
/// never empty.
pub fn fallback_models(adapter: &dyn VendorAdapter) -> Vec<ModelConfig> {
    adapter
        .static_catalog()
        .iter()
        .map(|(id, context_window)| {
            adapter.project_entry(&ModelCatalogEntry {
                id: (*id).to_string(),
                context_length: Some(*context_window),
            })
        })
        .collect()
}

/// Total catalog resolution: live discovery when possible, otherwise the
/// static catalog. Never fails.
pub async fn list_models(adapter: &dyn VendorAdapter, transport: &ChatTransport) -> Vec<ModelConfig> {
    match discover_models(adapter, transport).await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => {
            tracing::warn!(
                provider = adapter.provider_id(),
                "live listing contained no recognized models; serving the static catalog"
            );
            fallback_models(adapter)
        }
        Err(err) => {
            tracing::warn!(
                provider = adapter.provider_id(),
                kind = err.kind(),
                error = %err,
                "live model discovery failed; serving the static catalog"
            );
            fallback_models(adapter)
        }
    }
}
