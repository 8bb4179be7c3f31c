//! Pollinations provider implementation.
//!
//! Keyless community endpoint; the prompt travels in the URL path and the
//! response body is the image itself. Cheapest option, tried first.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::{Artifact, ImageFormat, ImageProvider};
use crate::request::ShapeHints;

pub const DEFAULT_POLLINATIONS_URL: &str = "https://image.pollinations.ai";

pub struct PollinationsProvider {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl PollinationsProvider {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        }
    }

    fn image_url(&self, prompt: &str, hints: &ShapeHints) -> String {
        let (width, height) = hints.aspect.dimensions();
        format!(
            "{}/prompt/{}?width={}&height={}&nologo=true",
            self.base_url,
            urlencoding::encode(prompt),
            width,
            height
        )
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    fn id(&self) -> &str {
        "pollinations"
    }

    fn name(&self) -> &str {
        "Pollinations"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(&self, prompt: &str, hints: &ShapeHints) -> ProviderResult<Artifact> {
        let url = self.image_url(prompt, hints);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let format = match resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            Some(ct) if ct.starts_with("image/png") => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        };

        let data = resp.bytes().await?.to_vec();
        if data.is_empty() {
            return Err(ProviderError::InvalidResponse("empty image body".into()));
        }

        Ok(Artifact::Bytes { data, format })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}
