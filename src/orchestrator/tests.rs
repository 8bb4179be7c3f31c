//! Orchestrator scenario tests with mock providers: fallback ordering,
//! caching, timeouts, exhaustion and placeholder behavior.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::{Artifact, ImageFormat, ImageProvider};
use crate::registry::ProviderRegistry;
use crate::request::{GenerationRequest, ShapeHints};

use super::*;

// ========================================================================
// Mock Provider Implementation
// ========================================================================

#[derive(Debug, Clone)]
enum MockBehavior {
    /// Respond successfully after the given delay.
    Succeed { delay: Duration },
    /// Respond with an API error.
    Fail { message: String },
    /// Never respond within any reasonable budget.
    Hang,
}

struct MockProvider {
    id: String,
    priority: u8,
    timeout: Duration,
    behavior: Arc<RwLock<MockBehavior>>,
    call_count: Arc<AtomicU32>,
}

impl MockProvider {
    fn new(id: &str, priority: u8, behavior: MockBehavior) -> Self {
        Self {
            id: id.to_string(),
            priority,
            timeout: Duration::from_millis(100),
            behavior: Arc::new(RwLock::new(behavior)),
            call_count: Arc::new(AtomicU32::new(0)),
        }
    }

    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn counter(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    async fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().await = behavior;
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(&self, _prompt: &str, _hints: &ShapeHints) -> ProviderResult<Artifact> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.read().await.clone();
        match behavior {
            MockBehavior::Succeed { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Artifact::Bytes {
                    data: vec![0x89, 0x50, 0x4E, 0x47],
                    format: ImageFormat::Png,
                })
            }
            MockBehavior::Fail { message } => Err(ProviderError::Api {
                status: 500,
                message,
            }),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Err(ProviderError::Timeout)
            }
        }
    }

    async fn health_check(&self) -> bool {
        !matches!(*self.behavior.read().await, MockBehavior::Hang)
    }
}

// ========================================================================
// Harness
// ========================================================================

struct Harness {
    orchestrator: Orchestrator,
    _storage: tempfile::TempDir,
}

fn harness(providers: Vec<Arc<MockProvider>>) -> Harness {
    let providers: Vec<Arc<dyn ImageProvider>> = providers
        .into_iter()
        .map(|p| p as Arc<dyn ImageProvider>)
        .collect();
    let storage = tempfile::tempdir().expect("tempdir");
    let orchestrator = Orchestrator::builder()
        .with_registry(Arc::new(ProviderRegistry::with_providers(providers)))
        .with_storage_root(storage.path())
        .with_success_ttl(Duration::from_secs(60))
        .with_placeholder_ttl(Duration::from_millis(80))
        .build();
    Harness {
        orchestrator,
        _storage: storage,
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::new("red linen wrap dress")
}

// ========================================================================
// Scenario 1: first provider wins, later providers untouched
// ========================================================================

#[tokio::test]
async fn test_priority_respected_first_success_stops_chain() {
    let a = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Succeed {
            delay: Duration::from_millis(2),
        },
    ));
    let b = Arc::new(MockProvider::new(
        "b",
        2,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let c = Arc::new(MockProvider::new(
        "c",
        3,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));

    let h = harness(vec![a.clone(), b.clone(), c.clone()]);
    let outcome = h.orchestrator.generate(&request()).await.unwrap();

    assert!(!outcome.degraded);
    assert_eq!(outcome.provider_used.as_deref(), Some("a"));
    assert!(outcome.attempts.is_empty());
    assert_eq!(a.call_count(), 1);
    assert_eq!(b.call_count(), 0);
    assert_eq!(c.call_count(), 0);
}

// ========================================================================
// Scenario 2: identical repeat is served from cache
// ========================================================================

#[tokio::test]
async fn test_cache_idempotence_no_second_provider_call() {
    let a = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let h = harness(vec![a.clone()]);

    let first = h.orchestrator.generate(&request()).await.unwrap();
    let second = h.orchestrator.generate(&request()).await.unwrap();

    assert_eq!(a.call_count(), 1);
    assert_eq!(first.reference, second.reference);
    assert_eq!(second.provider_used.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_cache_keys_reordered_style_lists_as_identical() {
    let a = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let h = harness(vec![a.clone()]);

    let style_ab = crate::request::StyleContext {
        colors: vec!["red".into(), "blue".into()],
        ..Default::default()
    };
    let style_ba = crate::request::StyleContext {
        colors: vec!["blue".into(), "red".into()],
        ..Default::default()
    };

    h.orchestrator
        .generate(&GenerationRequest::new("outfit").with_style(style_ab))
        .await
        .unwrap();
    h.orchestrator
        .generate(&GenerationRequest::new("outfit").with_style(style_ba))
        .await
        .unwrap();

    assert_eq!(a.call_count(), 1);
}

// ========================================================================
// Scenario 3: disabled provider absent, timeout falls through
// ========================================================================

#[tokio::test]
async fn test_timeout_falls_through_to_next_provider() {
    // "a" is disabled in this scenario: it simply is not in the registry,
    // so it can never appear in the attempt history.
    let b = Arc::new(
        MockProvider::new("b", 2, MockBehavior::Hang)
            .with_timeout(Duration::from_millis(50)),
    );
    let c = Arc::new(MockProvider::new(
        "c",
        3,
        MockBehavior::Succeed {
            delay: Duration::from_millis(3),
        },
    ));

    let h = harness(vec![b.clone(), c.clone()]);
    let outcome = h.orchestrator.generate(&request()).await.unwrap();

    assert_eq!(outcome.provider_used.as_deref(), Some("c"));
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.attempts[0].provider_id, "b");
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::TimedOut);
    assert!(outcome.attempts.iter().all(|att| att.provider_id != "a"));
    assert_eq!(b.call_count(), 1);
    assert_eq!(c.call_count(), 1);
}

#[tokio::test]
async fn test_timeout_is_bounded_by_provider_budget() {
    let hanging = Arc::new(
        MockProvider::new("hang", 1, MockBehavior::Hang)
            .with_timeout(Duration::from_millis(40)),
    );
    let h = harness(vec![hanging.clone()]);

    let started = std::time::Instant::now();
    let outcome = h.orchestrator.generate(&request()).await.unwrap();
    let elapsed = started.elapsed();

    assert!(outcome.degraded);
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::TimedOut);
    // Well under the mock's 600 s hang: the budget cut it off
    assert!(elapsed < Duration::from_secs(5));
    assert_eq!(hanging.call_count(), 1);
}

// ========================================================================
// Scenario 4: exhaustion, placeholder caching and short-TTL retry
// ========================================================================

#[tokio::test]
async fn test_all_failed_yields_placeholder_with_full_attempt_list() {
    let providers = vec![
        Arc::new(MockProvider::new(
            "a",
            1,
            MockBehavior::Fail {
                message: "server error".into(),
            },
        )),
        Arc::new(MockProvider::new(
            "b",
            2,
            MockBehavior::Fail {
                message: "quota exceeded".into(),
            },
        )),
        Arc::new(MockProvider::new(
            "c",
            3,
            MockBehavior::Fail {
                message: "bad gateway".into(),
            },
        )),
    ];
    let h = harness(providers);

    let outcome = h.orchestrator.generate(&request()).await.unwrap();
    assert!(outcome.degraded);
    assert!(outcome.provider_used.is_none());
    assert_eq!(outcome.attempts.len(), 3);
    let ids: Vec<&str> = outcome
        .attempts
        .iter()
        .map(|a| a.provider_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    // The placeholder is a real persisted artifact
    assert!(outcome.reference.location.ends_with(".svg"));
    assert!(std::path::Path::new(&outcome.reference.location).exists());
}

#[tokio::test]
async fn test_placeholder_cached_then_retried_after_short_ttl() {
    let a = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Fail {
            message: "down".into(),
        },
    ));
    let h = harness(vec![a.clone()]);

    let first = h.orchestrator.generate(&request()).await.unwrap();
    assert!(first.degraded);
    assert_eq!(a.call_count(), 1);

    // Within the placeholder TTL: served from cache, provider untouched
    let second = h.orchestrator.generate(&request()).await.unwrap();
    assert!(second.degraded);
    assert_eq!(a.call_count(), 1);

    // After the TTL expires the provider is retried, and can now succeed
    tokio::time::sleep(Duration::from_millis(120)).await;
    a.set_behavior(MockBehavior::Succeed {
        delay: Duration::ZERO,
    })
    .await;
    let third = h.orchestrator.generate(&request()).await.unwrap();
    assert!(!third.degraded);
    assert_eq!(a.call_count(), 2);
}

// ========================================================================
// Edge cases
// ========================================================================

#[tokio::test]
async fn test_empty_registry_goes_straight_to_placeholder() {
    let h = harness(Vec::new());
    let outcome = h.orchestrator.generate(&request()).await.unwrap();

    assert!(outcome.degraded);
    assert!(outcome.attempts.is_empty());
    let svg = std::fs::read_to_string(&outcome.reference.location).unwrap();
    assert!(svg.contains("No providers configured."));
}

#[tokio::test]
async fn test_malformed_request_contacts_no_provider() {
    let a = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let h = harness(vec![a.clone()]);

    let result = h.orchestrator.generate(&GenerationRequest::new("  ")).await;
    assert!(matches!(result, Err(crate::error::GenError::MalformedRequest(_))));
    assert_eq!(a.call_count(), 0);
}

#[tokio::test]
async fn test_persistence_failure_surfaces_as_error() {
    let a: Arc<dyn ImageProvider> = Arc::new(MockProvider::new(
        "a",
        1,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let orchestrator = Orchestrator::builder()
        .with_registry(Arc::new(ProviderRegistry::with_providers(vec![a])))
        .with_storage_root("/proc/lookforge-unwritable")
        .build();

    let result = orchestrator.generate(&request()).await;
    assert!(matches!(result, Err(crate::error::GenError::Persistence(_))));
}

#[tokio::test]
async fn test_registry_injection_sorts_by_priority() {
    // Providers handed over out of order still run cheapest-first
    let expensive = Arc::new(MockProvider::new(
        "expensive",
        3,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let cheap = Arc::new(MockProvider::new(
        "cheap",
        1,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let h = harness(vec![expensive.clone(), cheap.clone()]);

    let outcome = h.orchestrator.generate(&request()).await.unwrap();
    assert_eq!(outcome.provider_used.as_deref(), Some("cheap"));
    assert_eq!(expensive.call_count(), 0);
}

#[tokio::test]
async fn test_stats_and_spend_recorded_per_attempt() {
    let failing = Arc::new(MockProvider::new(
        "failing",
        1,
        MockBehavior::Fail {
            message: "boom".into(),
        },
    ));
    let winning = Arc::new(MockProvider::new(
        "winning",
        2,
        MockBehavior::Succeed {
            delay: Duration::ZERO,
        },
    ));
    let h = harness(vec![failing.clone(), winning.clone()]);

    h.orchestrator.generate(&request()).await.unwrap();

    let stats = h.orchestrator.stats().await;
    assert_eq!(stats["failing"].failed_attempts, 1);
    assert_eq!(stats["winning"].successful_attempts, 1);

    let spend = h.orchestrator.spend().await;
    assert_eq!(spend.generations, 1);
}

#[tokio::test]
async fn test_different_requests_do_not_share_cache() {
    let counter = {
        let a = Arc::new(MockProvider::new(
            "a",
            1,
            MockBehavior::Succeed {
                delay: Duration::ZERO,
            },
        ));
        let h = harness(vec![a.clone()]);

        h.orchestrator
            .generate(&GenerationRequest::new("red dress"))
            .await
            .unwrap();
        h.orchestrator
            .generate(&GenerationRequest::new("blue dress"))
            .await
            .unwrap();
        a.counter()
    };
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}
