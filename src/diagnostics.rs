//! Diagnostics subsystem.
//!
//! On-demand health probing and configuration reporting, independent of
//! the generation path. Strictly read-only observation: probe results are
//! never fed back into routing and never disable a provider.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::ProviderDescriptor;
use crate::registry::ProviderRegistry;

/// Budget for a single health probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregate classification across all enabled providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateStatus {
    /// Every enabled provider answered its probe.
    Healthy,
    /// At least one enabled provider answered.
    Degraded,
    /// No enabled provider answered, or none is enabled.
    Critical,
}

/// Probe result for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub id: String,
    pub reachable: bool,
    pub probe_ms: u64,
}

/// Snapshot returned by `probe_all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: AggregateStatus,
    pub providers: Vec<ProviderHealth>,
    pub checked_at: DateTime<Utc>,
}

/// Health probe and configuration summary over an existing registry.
pub struct Diagnostics {
    registry: Arc<ProviderRegistry>,
}

impl Diagnostics {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Probe every enabled provider concurrently and classify the result.
    pub async fn probe_all(&self) -> HealthReport {
        let probes = self.registry.providers().iter().map(|provider| {
            let provider = provider.clone();
            async move {
                let started = Instant::now();
                let reachable = tokio::time::timeout(PROBE_TIMEOUT, provider.health_check())
                    .await
                    .unwrap_or(false);
                ProviderHealth {
                    id: provider.id().to_string(),
                    reachable,
                    probe_ms: started.elapsed().as_millis() as u64,
                }
            }
        });

        let providers = futures::future::join_all(probes).await;
        let status = Self::classify(&providers);

        tracing::info!(
            ?status,
            probed = providers.len(),
            "provider health probe completed"
        );

        HealthReport {
            status,
            providers,
            checked_at: Utc::now(),
        }
    }

    /// Per-provider enablement, ordering, cost and timeout. No secrets.
    pub fn config_summary(&self) -> Vec<ProviderDescriptor> {
        self.registry.describe_all()
    }

    fn classify(providers: &[ProviderHealth]) -> AggregateStatus {
        if providers.is_empty() {
            return AggregateStatus::Critical;
        }
        let reachable = providers.iter().filter(|p| p.reachable).count();
        if reachable == providers.len() {
            AggregateStatus::Healthy
        } else if reachable > 0 {
            AggregateStatus::Degraded
        } else {
            AggregateStatus::Critical
        }
    }
}
