//! Builder pattern for constructing an Orchestrator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResultCache;
use crate::config::GenConfig;
use crate::cost::SpendTracker;
use crate::materialize::Materializer;
use crate::placeholder::PlaceholderGenerator;
use crate::prompt::PromptBuilder;
use crate::registry::ProviderRegistry;

use super::{Orchestrator, StatsRegistry};

/// Builder for constructing an Orchestrator.
pub struct OrchestratorBuilder {
    config: GenConfig,
    registry: Option<Arc<ProviderRegistry>>,
    storage_root: Option<PathBuf>,
    success_ttl: Option<Duration>,
    placeholder_ttl: Option<Duration>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: GenConfig::default(),
            registry: None,
            storage_root: None,
            success_ttl: None,
            placeholder_ttl: None,
        }
    }

    pub fn with_config(mut self, config: GenConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a pre-built registry instead of deriving one from config.
    pub fn with_registry(mut self, registry: Arc<ProviderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = Some(root.into());
        self
    }

    pub fn with_success_ttl(mut self, ttl: Duration) -> Self {
        self.success_ttl = Some(ttl);
        self
    }

    pub fn with_placeholder_ttl(mut self, ttl: Duration) -> Self {
        self.placeholder_ttl = Some(ttl);
        self
    }

    pub fn build(self) -> Orchestrator {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(ProviderRegistry::from_config(&self.config)));
        let storage_root = self
            .storage_root
            .unwrap_or_else(|| self.config.storage_root.clone());

        Orchestrator {
            registry,
            cache: ResultCache::new(),
            materializer: Materializer::new(storage_root),
            placeholders: PlaceholderGenerator::new(),
            prompts: PromptBuilder::new(),
            stats: StatsRegistry::new(),
            spend: SpendTracker::new(),
            success_ttl: self.success_ttl.unwrap_or_else(|| self.config.success_ttl()),
            placeholder_ttl: self
                .placeholder_ttl
                .unwrap_or_else(|| self.config.placeholder_ttl()),
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
