//! OpenAI Images provider implementation.
//!
//! The expensive, high-quality end of the fallback chain. Requests b64
//! payloads so the materializer always receives bytes.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::{Artifact, ImageFormat, ImageProvider};
use crate::request::{AspectRatio, QualityTier, ShapeHints};

pub const DEFAULT_OPENAI_MODEL: &str = "dall-e-3";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.trim().to_string(),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            client,
        }
    }

    /// Override the API host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Vendor size string for an aspect ratio.
    fn size_param(aspect: AspectRatio) -> &'static str {
        match aspect {
            AspectRatio::Square => "1024x1024",
            AspectRatio::Portrait => "1024x1792",
            AspectRatio::Landscape => "1792x1024",
        }
    }

    fn quality_param(tier: QualityTier) -> &'static str {
        match tier {
            QualityTier::High => "hd",
            _ => "standard",
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI Images"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(&self, prompt: &str, hints: &ShapeHints) -> ProviderResult<Artifact> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": Self::size_param(hints.aspect),
            "quality": Self::quality_param(hints.quality),
            "response_format": "b64_json",
        });

        let resp = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = resp.json().await?;
        let b64 = json["data"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|item| item["b64_json"].as_str())
            .ok_or_else(|| ProviderError::InvalidResponse("missing b64_json".into()))?;

        let data = BASE64
            .decode(b64)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad base64 payload: {}", e)))?;

        Ok(Artifact::Bytes {
            data,
            format: ImageFormat::Png,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
