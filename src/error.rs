//! Error types for the generation pipeline.
//!
//! Provider-side failures (`ProviderError`) never escape the orchestrator;
//! they are absorbed into attempt records and, at worst, a placeholder
//! result. Only `GenError` is visible to callers.

use thiserror::Error;

/// Result alias for provider adapter calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// A failure from a single provider attempt.
///
/// These are routine: the orchestrator records them and moves on to the
/// next provider in the chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider exceeded its per-call budget.
    #[error("provider timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but the payload was unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Short classification tag used in attempt records and placeholders.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout => "timeout",
            ProviderError::Api { .. } => "api_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::Http(_) => "http_error",
        }
    }
}

/// Caller-visible errors.
///
/// Everything else is absorbed: a request either resolves to a real
/// artifact or to a diagnostic placeholder.
#[derive(Debug, Error)]
pub enum GenError {
    /// The request failed validation before any provider was contacted.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A provider succeeded but the artifact could not be durably stored.
    /// A success that cannot be stored is not a success.
    #[error("failed to persist artifact: {0}")]
    Persistence(#[from] std::io::Error),
}
