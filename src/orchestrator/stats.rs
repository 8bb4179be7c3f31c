//! Per-provider usage statistics.
//!
//! Observational only: nothing here feeds back into routing decisions.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Statistics for a single provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderStats {
    pub total_attempts: u64,
    pub successful_attempts: u64,
    pub failed_attempts: u64,
    pub timed_out_attempts: u64,
    pub total_latency_ms: u64,
    pub total_cost_usd: f64,
    #[serde(skip)]
    pub last_used: Option<Instant>,
}

impl ProviderStats {
    pub fn avg_latency_ms(&self) -> u64 {
        if self.successful_attempts == 0 {
            0
        } else {
            self.total_latency_ms / self.successful_attempts
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            1.0
        } else {
            self.successful_attempts as f64 / self.total_attempts as f64
        }
    }

    pub fn record_success(&mut self, latency_ms: u64, cost_usd: f64) {
        self.total_attempts += 1;
        self.successful_attempts += 1;
        self.total_latency_ms += latency_ms;
        self.total_cost_usd += cost_usd;
        self.last_used = Some(Instant::now());
    }

    pub fn record_failure(&mut self) {
        self.total_attempts += 1;
        self.failed_attempts += 1;
        self.last_used = Some(Instant::now());
    }

    pub fn record_timeout(&mut self) {
        self.total_attempts += 1;
        self.timed_out_attempts += 1;
        self.last_used = Some(Instant::now());
    }
}

/// Concurrent-safe stats store keyed by provider id.
#[derive(Default)]
pub struct StatsRegistry {
    inner: RwLock<HashMap<String, ProviderStats>>,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_success(&self, provider_id: &str, latency_ms: u64, cost_usd: f64) {
        self.inner
            .write()
            .await
            .entry(provider_id.to_string())
            .or_default()
            .record_success(latency_ms, cost_usd);
    }

    pub async fn record_failure(&self, provider_id: &str) {
        self.inner
            .write()
            .await
            .entry(provider_id.to_string())
            .or_default()
            .record_failure();
    }

    pub async fn record_timeout(&self, provider_id: &str) {
        self.inner
            .write()
            .await
            .entry(provider_id.to_string())
            .or_default()
            .record_timeout();
    }

    pub async fn snapshot(&self) -> HashMap<String, ProviderStats> {
        self.inner.read().await.clone()
    }
}
