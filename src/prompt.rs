//! Prompt enhancement pipeline.
//!
//! Turns a raw user prompt plus structured style context into richer,
//! provider-appropriate phrasing. Referentially transparent for identical
//! inputs, except for one deliberately randomized photography synonym that
//! adds phrasing variety. Cache keys are derived from the request itself
//! (`GenerationRequest::normalized_key`), never from the enhanced string.

use rand::seq::SliceRandom;

use crate::request::{GenerationRequest, QualityTier};

/// Randomized photography phrasings. One is picked per enhancement.
const PHOTOGRAPHY_SYNONYMS: &[&str] = &[
    "editorial fashion photograph",
    "professional lookbook shot",
    "high-fashion studio photograph",
    "glossy magazine editorial",
];

/// Builds enhanced prompts for a target provider.
///
/// Stateless; safe to share and call concurrently.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Layer style, season, occasion and technical modifiers onto the base
    /// prompt. The input request is never mutated.
    pub fn enhance(&self, request: &GenerationRequest, provider_hint: Option<&str>) -> String {
        let mut parts: Vec<String> = Vec::new();

        let framing = PHOTOGRAPHY_SYNONYMS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PHOTOGRAPHY_SYNONYMS[0]);
        parts.push(format!("{} of {}", framing, request.prompt.trim()));

        if let Some(style) = &request.style {
            if !style.styles.is_empty() {
                parts.push(format!("{} style", style.styles.join(" and ")));
            }
            if !style.colors.is_empty() {
                parts.push(format!("color palette of {}", style.colors.join(", ")));
            }
            if !style.seasons.is_empty() {
                parts.push(format!("{} season collection", style.seasons.join("/")));
            }
            if let Some(occasion) = &style.occasion {
                parts.push(format!("styled for {}", occasion));
            }
        }

        // Market modifier: the magazine renderer expects a clean catalogue look
        parts.push("full outfit visible, neutral background".to_string());

        parts.push(self.quality_modifiers(request.hints.quality).to_string());

        let enhanced = parts.join(", ");
        match provider_hint {
            // Pollinations encodes the prompt in the URL path; keep it compact
            Some("pollinations") => Self::truncate(&enhanced, 480),
            _ => enhanced,
        }
    }

    fn quality_modifiers(&self, tier: QualityTier) -> &'static str {
        match tier {
            QualityTier::Draft => "clean lighting",
            QualityTier::Standard => "sharp focus, soft studio lighting, detailed fabric texture",
            QualityTier::High => {
                "sharp focus, soft studio lighting, detailed fabric texture, \
                 ultra detailed, 8k resolution"
            }
        }
    }

    fn truncate(s: &str, max: usize) -> String {
        if s.chars().count() <= max {
            s.to_string()
        } else {
            s.chars().take(max).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::StyleContext;

    fn request_with_style() -> GenerationRequest {
        GenerationRequest::new("red linen wrap dress").with_style(StyleContext {
            colors: vec!["crimson".into(), "ivory".into()],
            styles: vec!["minimalist".into()],
            seasons: vec!["summer".into()],
            occasion: Some("garden wedding".into()),
        })
    }

    #[test]
    fn test_enhance_contains_base_prompt() {
        let request = request_with_style();
        let enhanced = PromptBuilder::new().enhance(&request, None);
        assert!(enhanced.contains("red linen wrap dress"));
    }

    #[test]
    fn test_enhance_layers_style_context() {
        let request = request_with_style();
        let enhanced = PromptBuilder::new().enhance(&request, None);
        assert!(enhanced.contains("minimalist style"));
        assert!(enhanced.contains("crimson, ivory"));
        assert!(enhanced.contains("summer season"));
        assert!(enhanced.contains("styled for garden wedding"));
    }

    #[test]
    fn test_enhance_uses_known_framing_synonym() {
        let request = GenerationRequest::new("dress");
        let enhanced = PromptBuilder::new().enhance(&request, None);
        assert!(PHOTOGRAPHY_SYNONYMS.iter().any(|s| enhanced.starts_with(s)));
    }

    #[test]
    fn test_quality_tiers_change_technical_modifiers() {
        let builder = PromptBuilder::new();
        let draft = builder.enhance(
            &GenerationRequest::new("dress").with_quality(QualityTier::Draft),
            None,
        );
        let high = builder.enhance(
            &GenerationRequest::new("dress").with_quality(QualityTier::High),
            None,
        );
        assert!(!draft.contains("8k resolution"));
        assert!(high.contains("8k resolution"));
    }

    #[test]
    fn test_enhance_does_not_mutate_request() {
        let request = request_with_style();
        let before = request.clone();
        let _ = PromptBuilder::new().enhance(&request, Some("openai"));
        assert_eq!(request, before);
    }

    #[test]
    fn test_pollinations_hint_bounds_length() {
        let request = GenerationRequest::new("dress ".repeat(150));
        let enhanced = PromptBuilder::new().enhance(&request, Some("pollinations"));
        assert!(enhanced.chars().count() <= 480);
    }
}
