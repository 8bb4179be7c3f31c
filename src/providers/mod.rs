//! Image provider implementations.
//!
//! Concrete implementations of the `ImageProvider` capability plus the
//! canonical provider metadata table.
//!
//! Adding a new provider requires:
//! 1. A new enum variant in `ProviderConfig`
//! 2. A new entry in `PROVIDERS`
//! 3. The provider implementation file

mod huggingface;
mod openai;
mod pollinations;

pub use huggingface::{HuggingFaceProvider, DEFAULT_HF_MODEL};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_MODEL};
pub use pollinations::{PollinationsProvider, DEFAULT_POLLINATIONS_URL};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cost::ProviderPricing;
use crate::error::ProviderResult;
use crate::request::ShapeHints;

// ── Artifacts ───────────────────────────────────────────────────────────────

/// Image payload format as returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// What a successful provider call yields: raw bytes or a remote reference
/// the materializer records as-is.
#[derive(Debug, Clone)]
pub enum Artifact {
    Bytes { data: Vec<u8>, format: ImageFormat },
    Remote { url: String },
}

// ── Provider capability ─────────────────────────────────────────────────────

/// The capability every generation backend exposes to the orchestrator.
///
/// Adapters isolate vendor wire formats completely; the orchestrator only
/// sees this trait.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Stable identifier, e.g. "pollinations".
    fn id(&self) -> &str;

    /// Human-readable label.
    fn name(&self) -> &str;

    /// Fallback rank; lower is tried first. Fixed for the process lifetime.
    fn priority(&self) -> u8;

    /// Per-call budget enforced by the orchestrator.
    fn timeout(&self) -> Duration;

    fn pricing(&self) -> Option<ProviderPricing> {
        ProviderPricing::for_provider(self.id())
    }

    /// Generate one image for an already-enhanced prompt.
    async fn generate(&self, prompt: &str, hints: &ShapeHints) -> ProviderResult<Artifact>;

    /// Cheap reachability probe for the diagnostics subsystem.
    async fn health_check(&self) -> bool;
}

// ── Auth method ─────────────────────────────────────────────────────────────

/// How a provider authenticates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    /// Standard API key / bearer token.
    ApiKey,
    /// No credential required (community endpoint).
    Keyless,
}

// ── Provider metadata ───────────────────────────────────────────────────────

/// Static metadata for a known provider. Single source of truth for
/// identity, ordering and defaults.
#[derive(Clone, Debug)]
pub struct ProviderMeta {
    pub id: &'static str,
    pub display_name: &'static str,
    pub auth_method: AuthMethod,
    pub priority: u8,
    pub default_timeout_secs: u64,
    /// Environment variable holding the credential, if any.
    pub credential_env: &'static str,
}

impl ProviderMeta {
    pub fn needs_api_key(&self) -> bool {
        self.auth_method == AuthMethod::ApiKey
    }
}

/// Canonical table of all known providers, cheapest-first.
pub const PROVIDERS: &[ProviderMeta] = &[
    ProviderMeta {
        id: "pollinations",
        display_name: "Pollinations",
        auth_method: AuthMethod::Keyless,
        priority: 1,
        default_timeout_secs: 20,
        credential_env: "",
    },
    ProviderMeta {
        id: "huggingface",
        display_name: "Hugging Face Inference",
        auth_method: AuthMethod::ApiKey,
        priority: 2,
        default_timeout_secs: 30,
        credential_env: "HUGGINGFACE_API_TOKEN",
    },
    ProviderMeta {
        id: "openai",
        display_name: "OpenAI Images",
        auth_method: AuthMethod::ApiKey,
        priority: 3,
        default_timeout_secs: 60,
        credential_env: "OPENAI_API_KEY",
    },
];

/// Look up a provider's metadata by ID.
pub fn find_provider_meta(id: &str) -> Option<&'static ProviderMeta> {
    PROVIDERS.iter().find(|p| p.id == id)
}

// ── Descriptor ──────────────────────────────────────────────────────────────

/// Registry record describing a provider's identity, cost, ordering and
/// enablement. Safe to expose through diagnostics (no secrets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub id: String,
    pub label: String,
    pub cost_per_call_usd: f64,
    pub priority: u8,
    pub enabled: bool,
    pub timeout_secs: u64,
}

// ── ProviderConfig ──────────────────────────────────────────────────────────

/// Configuration for constructing provider adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProviderConfig {
    Pollinations {
        base_url: String,
        timeout_secs: u64,
    },
    HuggingFace {
        api_token: String,
        model: String,
        timeout_secs: u64,
    },
    OpenAi {
        api_key: String,
        model: String,
        timeout_secs: u64,
    },
}

impl ProviderConfig {
    /// Create a provider adapter from this configuration.
    pub fn create_provider(&self) -> Arc<dyn ImageProvider> {
        match self {
            ProviderConfig::Pollinations {
                base_url,
                timeout_secs,
            } => Arc::new(PollinationsProvider::new(
                base_url.clone(),
                Duration::from_secs(*timeout_secs),
            )),
            ProviderConfig::HuggingFace {
                api_token,
                model,
                timeout_secs,
            } => Arc::new(HuggingFaceProvider::new(
                api_token.clone(),
                model.clone(),
                Duration::from_secs(*timeout_secs),
            )),
            ProviderConfig::OpenAi {
                api_key,
                model,
                timeout_secs,
            } => Arc::new(OpenAiProvider::new(
                api_key.clone(),
                model.clone(),
                Duration::from_secs(*timeout_secs),
            )),
        }
    }

    pub fn provider_id(&self) -> &'static str {
        match self {
            ProviderConfig::Pollinations { .. } => "pollinations",
            ProviderConfig::HuggingFace { .. } => "huggingface",
            ProviderConfig::OpenAi { .. } => "openai",
        }
    }
}
