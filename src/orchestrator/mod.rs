//! Fallback orchestrator.
//!
//! The core state machine: `Pending → Attempting(provider) → { Succeeded |
//! next provider } → … → Exhausted → Placeholder`. Providers are tried
//! strictly sequentially in priority order, cheapest first, and a second
//! attempt is only paid for when the first fails. Per-provider failures are
//! absorbed into attempt records; only a malformed request or a persistence
//! failure ever surfaces to the caller as an error.
//!
//! Concurrent requests for the same normalized key are not coalesced: two
//! callers arriving before either has cached a result will both drive
//! provider calls. Best-effort caching is the only deduplication.

pub mod builder;
pub mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use builder::OrchestratorBuilder;
pub use stats::{ProviderStats, StatsRegistry};
pub use types::{
    AttemptOutcome, GenerationAttempt, GenerationOutcome, GenerationResult, StableReference,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::ResultCache;
use crate::config::GenConfig;
use crate::cost::{SpendSummary, SpendTracker};
use crate::error::GenError;
use crate::materialize::Materializer;
use crate::placeholder::PlaceholderGenerator;
use crate::prompt::PromptBuilder;
use crate::registry::ProviderRegistry;
use crate::request::GenerationRequest;

/// Drives generation requests through the provider fallback chain.
pub struct Orchestrator {
    registry: Arc<ProviderRegistry>,
    cache: ResultCache,
    materializer: Materializer,
    placeholders: PlaceholderGenerator,
    prompts: PromptBuilder,
    stats: StatsRegistry,
    spend: SpendTracker,
    success_ttl: Duration,
    placeholder_ttl: Duration,
}

impl Orchestrator {
    /// Build from configuration with all defaults.
    pub fn from_config(config: &GenConfig) -> Self {
        OrchestratorBuilder::new().with_config(config.clone()).build()
    }

    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub async fn stats(&self) -> HashMap<String, ProviderStats> {
        self.stats.snapshot().await
    }

    pub async fn spend(&self) -> SpendSummary {
        self.spend.summary().await
    }

    /// Resolve one generation request.
    ///
    /// Always returns a renderable outcome for provider-side problems: a
    /// real artifact or a clearly-labeled placeholder.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenError> {
        request.validate()?;
        let key = request.normalized_key();

        if let Some(result) = self.cache.get(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(result.into());
        }

        if self.registry.is_empty() {
            tracing::warn!("no generation providers configured");
            return self.resolve_placeholder(request, Vec::new()).await;
        }

        let mut attempts: Vec<GenerationAttempt> = Vec::new();

        for provider in self.registry.providers() {
            let prompt = self.prompts.enhance(request, Some(provider.id()));
            tracing::debug!(
                provider = provider.id(),
                key = %key,
                "attempting provider"
            );

            let started = Instant::now();
            let call = provider.generate(&prompt, &request.hints);
            match tokio::time::timeout(provider.timeout(), call).await {
                Ok(Ok(artifact)) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    let cost_usd = provider
                        .pricing()
                        .map(|p| p.per_call(request.hints.quality))
                        .unwrap_or(0.0);

                    let reference = self
                        .materializer
                        .persist(&artifact, request, provider.id(), cost_usd, latency_ms)
                        .await?;

                    self.stats
                        .record_success(provider.id(), latency_ms, cost_usd)
                        .await;
                    self.spend.record(provider.id(), cost_usd).await;

                    let result = GenerationResult::Generated {
                        reference,
                        provider_id: provider.id().to_string(),
                        cost_usd,
                        latency_ms,
                    };
                    self.cache
                        .set(key.clone(), result.clone(), self.success_ttl)
                        .await;

                    tracing::info!(
                        provider = provider.id(),
                        latency_ms,
                        cost_usd,
                        key = %key,
                        "generation succeeded"
                    );

                    let mut outcome = GenerationOutcome::from(result);
                    outcome.attempts = attempts;
                    return Ok(outcome);
                }
                Ok(Err(err)) => {
                    // Routine: record and move to the next provider
                    let latency_ms = started.elapsed().as_millis() as u64;
                    tracing::warn!(
                        provider = provider.id(),
                        error = %err,
                        "provider attempt failed"
                    );
                    self.stats.record_failure(provider.id()).await;
                    attempts.push(GenerationAttempt::failed(
                        provider.id(),
                        err.to_string(),
                        latency_ms,
                    ));
                }
                Err(_) => {
                    // Budget exceeded; the in-flight call is dropped and any
                    // late result discarded
                    let latency_ms = provider.timeout().as_millis() as u64;
                    tracing::warn!(
                        provider = provider.id(),
                        budget_ms = latency_ms,
                        "provider attempt timed out"
                    );
                    self.stats.record_timeout(provider.id()).await;
                    attempts.push(GenerationAttempt::timed_out(provider.id(), latency_ms));
                }
            }
        }

        tracing::warn!(
            key = %key,
            attempts = attempts.len(),
            "all providers exhausted, serving placeholder"
        );
        self.resolve_placeholder(request, attempts).await
    }

    async fn resolve_placeholder(
        &self,
        request: &GenerationRequest,
        attempts: Vec<GenerationAttempt>,
    ) -> Result<GenerationOutcome, GenError> {
        let artifact = self.placeholders.build(request, &attempts);
        let reference = self
            .materializer
            .persist_placeholder(&artifact, request)
            .await?;

        let result = GenerationResult::Degraded {
            reference,
            attempts,
        };
        // Short TTL: retry the providers again soon without hammering them
        self.cache
            .set(request.normalized_key(), result.clone(), self.placeholder_ttl)
            .await;

        Ok(result.into())
    }
}
