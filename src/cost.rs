//! Per-image pricing estimates and spend tracking.
//!
//! Image providers bill per call rather than per token, so pricing here is a
//! flat per-image estimate keyed by provider and quality tier.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::request::QualityTier;

// ============================================================================
// Provider Pricing
// ============================================================================

/// Per-call pricing for a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPricing {
    pub provider_id: String,
    /// Estimated USD cost of a single generation at each tier.
    pub draft_usd: f64,
    pub standard_usd: f64,
    pub high_usd: f64,
    /// Whether the provider is effectively free (local or bundled quota).
    pub is_free: bool,
}

impl ProviderPricing {
    pub fn free(provider_id: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            draft_usd: 0.0,
            standard_usd: 0.0,
            high_usd: 0.0,
            is_free: true,
        }
    }

    pub fn per_call(&self, tier: QualityTier) -> f64 {
        if self.is_free {
            return 0.0;
        }
        match tier {
            QualityTier::Draft => self.draft_usd,
            QualityTier::Standard => self.standard_usd,
            QualityTier::High => self.high_usd,
        }
    }

    /// Known pricing for the configured providers (as of mid 2025).
    pub fn for_provider(provider_id: &str) -> Option<Self> {
        let (draft, standard, high) = match provider_id {
            // Keyless community endpoint; negligible but nonzero to keep the
            // cheapest-first ordering honest in reports
            "pollinations" => (0.0005, 0.0005, 0.0005),
            // Free inference tier
            "huggingface" => return Some(Self::free("huggingface")),
            // DALL-E 3: standard vs hd billing
            "openai" => (0.040, 0.040, 0.080),
            _ => return None,
        };
        Some(Self {
            provider_id: provider_id.to_string(),
            draft_usd: draft,
            standard_usd: standard,
            high_usd: high,
            is_free: false,
        })
    }
}

// ============================================================================
// Spend Tracker
// ============================================================================

/// Cumulative spend per provider for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendSummary {
    pub total_usd: f64,
    pub per_provider: HashMap<String, f64>,
    pub generations: u64,
}

/// Observational spend accumulator. Never gates requests.
#[derive(Clone, Default)]
pub struct SpendTracker {
    inner: Arc<RwLock<SpendSummary>>,
}

impl SpendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, provider_id: &str, cost_usd: f64) {
        let mut summary = self.inner.write().await;
        summary.total_usd += cost_usd;
        summary.generations += 1;
        *summary
            .per_provider
            .entry(provider_id.to_string())
            .or_insert(0.0) += cost_usd;
    }

    pub async fn summary(&self) -> SpendSummary {
        self.inner.read().await.clone()
    }
}
