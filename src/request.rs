//! Generation request model and cache-key normalization.
//!
//! A `GenerationRequest` is immutable once created. Its normalized key is
//! derived from a canonical serialization of the *pre-enhancement* fields,
//! so the randomized phrasing added later by the prompt pipeline can never
//! defeat caching.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::GenError;

/// Longest prompt accepted before rejection as malformed.
pub const MAX_PROMPT_LEN: usize = 2_000;

// ============================================================================
// Shape Hints
// ============================================================================

/// Output aspect ratio requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Square,
    Portrait,
    Landscape,
}

impl AspectRatio {
    /// Pixel dimensions handed to providers.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Portrait => (1024, 1536),
            AspectRatio::Landscape => (1536, 1024),
        }
    }

    fn token(&self) -> &'static str {
        match self {
            AspectRatio::Square => "square",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Landscape => "landscape",
        }
    }
}

/// Requested quality tier. Drives both provider parameters and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Draft,
    Standard,
    High,
}

impl QualityTier {
    fn token(&self) -> &'static str {
        match self {
            QualityTier::Draft => "draft",
            QualityTier::Standard => "standard",
            QualityTier::High => "high",
        }
    }
}

/// Output shape hints carried alongside the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeHints {
    pub aspect: AspectRatio,
    pub quality: QualityTier,
}

impl Default for ShapeHints {
    fn default() -> Self {
        Self {
            aspect: AspectRatio::Square,
            quality: QualityTier::Standard,
        }
    }
}

// ============================================================================
// Style Context
// ============================================================================

/// Structured style context attached to a request by the outfit planner.
///
/// List-valued fields are order-insensitive for caching purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleContext {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

impl StyleContext {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.styles.is_empty()
            && self.seasons.is_empty()
            && self.occasion.is_none()
    }

    /// Lowercased, sorted, deduplicated copy of a list field.
    fn canonical_list(items: &[String]) -> Vec<String> {
        let mut out: Vec<String> = items
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

// ============================================================================
// Generation Request
// ============================================================================

/// A single content-generation request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleContext>,
    #[serde(default)]
    pub hints: ShapeHints,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: None,
            hints: ShapeHints::default(),
        }
    }

    pub fn with_style(mut self, style: StyleContext) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_aspect(mut self, aspect: AspectRatio) -> Self {
        self.hints.aspect = aspect;
        self
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.hints.quality = quality;
        self
    }

    /// Reject malformed requests before any provider is contacted.
    pub fn validate(&self) -> Result<(), GenError> {
        let trimmed = self.prompt.trim();
        if trimmed.is_empty() {
            return Err(GenError::MalformedRequest("prompt is empty".into()));
        }
        if trimmed.len() > MAX_PROMPT_LEN {
            return Err(GenError::MalformedRequest(format!(
                "prompt exceeds {} characters",
                MAX_PROMPT_LEN
            )));
        }
        Ok(())
    }

    /// Short prompt excerpt for logs and placeholder artifacts.
    pub fn summary(&self) -> String {
        let trimmed = self.prompt.trim();
        if trimmed.chars().count() <= 80 {
            trimmed.to_string()
        } else {
            let head: String = trimmed.chars().take(77).collect();
            format!("{}...", head)
        }
    }

    /// Canonical serialization used as the hash input for the cache key.
    ///
    /// Field order is fixed and list fields are sorted, so two semantically
    /// identical requests always serialize identically.
    fn canonical_form(&self) -> String {
        let style = self.style.clone().unwrap_or_default();
        let colors = StyleContext::canonical_list(&style.colors);
        let styles = StyleContext::canonical_list(&style.styles);
        let seasons = StyleContext::canonical_list(&style.seasons);
        let occasion = style
            .occasion
            .as_deref()
            .map(|o| o.trim().to_lowercase())
            .unwrap_or_default();

        format!(
            "prompt={}\ncolors={}\nstyles={}\nseasons={}\noccasion={}\naspect={}\nquality={}",
            self.prompt.trim().to_lowercase(),
            colors.join(","),
            styles.join(","),
            seasons.join(","),
            occasion,
            self.hints.aspect.token(),
            self.hints.quality.token(),
        )
    }

    /// Deterministic digest of the canonical form.
    pub fn normalized_key(&self) -> NormalizedKey {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_form().as_bytes());
        NormalizedKey(hex::encode(hasher.finalize()))
    }
}

/// Content-addressed cache key for a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Shortened for log readability
        write!(f, "{}", &self.0[..12.min(self.0.len())])
    }
}
