//! Provider registry.
//!
//! Built once at startup from configuration and read-only afterwards. A
//! provider without its credential is simply absent: it is never attempted,
//! never produces an attempt record, and never consumes timeout budget.

use std::sync::Arc;

use crate::config::GenConfig;
use crate::cost::ProviderPricing;
use crate::providers::{find_provider_meta, ImageProvider, ProviderDescriptor, PROVIDERS};
use crate::request::QualityTier;

/// Immutable, priority-ordered set of enabled providers.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl ProviderRegistry {
    /// Build from configuration. Enablement is decided here, once.
    pub fn from_config(config: &GenConfig) -> Self {
        let providers = config
            .enabled_provider_configs()
            .iter()
            .map(|c| c.create_provider())
            .collect();
        Self::with_providers(providers)
    }

    /// Build from explicit adapters. Used by tests and custom setups.
    pub fn with_providers(mut providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Enabled providers in ascending priority order.
    pub fn providers(&self) -> &[Arc<dyn ImageProvider>] {
        &self.providers
    }

    /// Live adapter handle for an enabled provider.
    pub fn provider(&self, id: &str) -> Option<&Arc<dyn ImageProvider>> {
        self.providers.iter().find(|p| p.id() == id)
    }

    /// Descriptors for the enabled providers, in fallback order.
    pub fn list_enabled(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|p| self.descriptor_for(p.as_ref(), true))
            .collect()
    }

    /// Descriptor for one provider, enabled or not. Disabled providers are
    /// described from the canonical metadata table.
    pub fn describe(&self, id: &str) -> Option<ProviderDescriptor> {
        if let Some(provider) = self.provider(id) {
            return Some(self.descriptor_for(provider.as_ref(), true));
        }
        find_provider_meta(id).map(|meta| ProviderDescriptor {
            id: meta.id.to_string(),
            label: meta.display_name.to_string(),
            cost_per_call_usd: ProviderPricing::for_provider(meta.id)
                .map(|p| p.per_call(QualityTier::Standard))
                .unwrap_or(0.0),
            priority: meta.priority,
            enabled: false,
            timeout_secs: meta.default_timeout_secs,
        })
    }

    /// Descriptors for every known provider, marking which are enabled.
    /// Diagnostics uses this for the configuration summary.
    pub fn describe_all(&self) -> Vec<ProviderDescriptor> {
        PROVIDERS
            .iter()
            .filter_map(|meta| self.describe(meta.id))
            .collect()
    }

    fn descriptor_for(&self, provider: &dyn ImageProvider, enabled: bool) -> ProviderDescriptor {
        ProviderDescriptor {
            id: provider.id().to_string(),
            label: provider.name().to_string(),
            cost_per_call_usd: provider
                .pricing()
                .map(|p| p.per_call(QualityTier::Standard))
                .unwrap_or(0.0),
            priority: provider.priority(),
            enabled,
            timeout_secs: provider.timeout().as_secs(),
        }
    }
}
