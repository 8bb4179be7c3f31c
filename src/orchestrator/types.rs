//! Attempt records and result types shared across the generation pipeline.

use serde::{Deserialize, Serialize};

// ============================================================================
// Attempts
// ============================================================================

/// Terminal outcome of one provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    /// The provider exceeded its configured budget.
    TimedOut,
    /// The provider responded but with an error or unusable payload.
    Failed { detail: String },
    /// Reserved for rendering disabled providers in diagnostics output.
    /// The orchestrator itself never records a skipped attempt: a disabled
    /// provider is excluded before the chain starts.
    Skipped,
}

/// One entry in the ordered attempt history of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationAttempt {
    pub provider_id: String,
    pub outcome: AttemptOutcome,
    pub latency_ms: u64,
}

impl GenerationAttempt {
    pub fn succeeded(provider_id: &str, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::Succeeded,
            latency_ms,
        }
    }

    pub fn timed_out(provider_id: &str, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::TimedOut,
            latency_ms,
        }
    }

    pub fn failed(provider_id: &str, detail: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            outcome: AttemptOutcome::Failed {
                detail: detail.into(),
            },
            latency_ms,
        }
    }

    /// Human-readable line used by the placeholder artifact.
    pub fn describe(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Succeeded => format!("{}: ok ({} ms)", self.provider_id, self.latency_ms),
            AttemptOutcome::TimedOut => {
                format!("{}: timed out after {} ms", self.provider_id, self.latency_ms)
            }
            AttemptOutcome::Failed { detail } => format!("{}: {}", self.provider_id, detail),
            AttemptOutcome::Skipped => format!("{}: skipped (not configured)", self.provider_id),
        }
    }
}

// ============================================================================
// References & Results
// ============================================================================

/// Stable reference to a persisted artifact: its id, where the bytes live
/// (filesystem path or remote URL) and the sidecar metadata path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableReference {
    pub id: String,
    pub location: String,
    pub metadata_path: String,
}

/// Final resolution of a request. Never partially populated: either a real
/// artifact with its winning provider, or a placeholder with the full
/// attempt history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Generated {
        reference: StableReference,
        provider_id: String,
        cost_usd: f64,
        latency_ms: u64,
    },
    Degraded {
        reference: StableReference,
        attempts: Vec<GenerationAttempt>,
    },
}

impl GenerationResult {
    pub fn is_degraded(&self) -> bool {
        matches!(self, GenerationResult::Degraded { .. })
    }

    pub fn reference(&self) -> &StableReference {
        match self {
            GenerationResult::Generated { reference, .. } => reference,
            GenerationResult::Degraded { reference, .. } => reference,
        }
    }
}

/// What the orchestrator hands back to the application layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub reference: StableReference,
    /// Winning provider id; `None` for placeholder results.
    pub provider_used: Option<String>,
    pub degraded: bool,
    pub attempts: Vec<GenerationAttempt>,
}

impl From<GenerationResult> for GenerationOutcome {
    fn from(result: GenerationResult) -> Self {
        match result {
            GenerationResult::Generated {
                reference,
                provider_id,
                ..
            } => Self {
                reference,
                provider_used: Some(provider_id),
                degraded: false,
                attempts: Vec::new(),
            },
            GenerationResult::Degraded {
                reference,
                attempts,
            } => Self {
                reference,
                provider_used: None,
                degraded: true,
                attempts,
            },
        }
    }
}
