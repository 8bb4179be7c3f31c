//! Placeholder generator.
//!
//! When every provider has failed, the caller still receives something
//! renderable: a locally-built SVG that embeds the request summary and the
//! full attempt history for diagnosis. No external provider, network call
//! or image library is involved.

use crate::orchestrator::GenerationAttempt;
use crate::providers::{Artifact, ImageFormat};
use crate::request::GenerationRequest;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 1024;

/// Builds diagnostic placeholder artifacts from `(request, attempts)` only.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderGenerator;

impl PlaceholderGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Construct the SVG artifact. Infallible and fully offline.
    pub fn build(&self, request: &GenerationRequest, attempts: &[GenerationAttempt]) -> Artifact {
        let mut lines: Vec<String> = Vec::new();
        lines.push("Image generation unavailable".to_string());
        lines.push(format!("Request: {}", request.summary()));
        lines.push(String::new());

        if attempts.is_empty() {
            lines.push("No providers configured.".to_string());
            lines.push("Set provider credentials to enable generation.".to_string());
        } else {
            lines.push(format!("Providers tried ({}):", attempts.len()));
            for attempt in attempts {
                lines.push(format!("  {}", attempt.describe()));
            }
        }

        let text_rows: String = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    r##"<text x="48" y="{}" font-family="monospace" font-size="22" fill="#6b6259">{}</text>"##,
                    160 + i * 34,
                    escape_xml(line)
                )
            })
            .collect::<Vec<_>>()
            .join("\n  ");

        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect width="{w}" height="{h}" fill="#f5f1ea"/>
  <rect x="24" y="24" width="{iw}" height="{ih}" fill="none" stroke="#c9bfb2" stroke-width="3" stroke-dasharray="12 8"/>
  <text x="48" y="96" font-family="sans-serif" font-size="40" fill="#4a443c">Lookforge</text>
  {rows}
</svg>
"##,
            w = WIDTH,
            h = HEIGHT,
            iw = WIDTH - 48,
            ih = HEIGHT - 48,
            rows = text_rows,
        );

        Artifact::Bytes {
            data: svg.into_bytes(),
            format: ImageFormat::Svg,
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
