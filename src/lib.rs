/// Lookforge - generative imagery orchestration for a fashion assistant.
///
/// Core library providing prompt enhancement, multi-provider image
/// generation with ordered fallback, result caching and persistence,
/// placeholder degradation, and provider diagnostics.

pub mod cache;
pub mod config;
pub mod cost;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod orchestrator;
pub mod placeholder;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod request;

pub use config::GenConfig;
pub use diagnostics::{AggregateStatus, Diagnostics, HealthReport};
pub use error::{GenError, ProviderError};
pub use orchestrator::{GenerationOutcome, Orchestrator, OrchestratorBuilder};
pub use registry::ProviderRegistry;
pub use request::{AspectRatio, GenerationRequest, QualityTier, StyleContext};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
