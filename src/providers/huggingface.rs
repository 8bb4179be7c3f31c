//! Hugging Face Inference provider implementation.
//!
//! Free-tier text-to-image inference; the response body is raw image bytes.
//! A 503 means the model is cold-loading, which counts as reachable for
//! health purposes but as a routine failure for generation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ProviderError, ProviderResult};
use crate::providers::{Artifact, ImageFormat, ImageProvider};
use crate::request::ShapeHints;

pub const DEFAULT_HF_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

pub struct HuggingFaceProvider {
    api_token: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(api_token: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_token: api_token.trim().to_string(),
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

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageProvider for HuggingFaceProvider {
    fn id(&self) -> &str {
        "huggingface"
    }

    fn name(&self) -> &str {
        "Hugging Face Inference"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn generate(&self, prompt: &str, hints: &ShapeHints) -> ProviderResult<Artifact> {
        let (width, height) = hints.aspect.dimensions();
        let body = serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "width": width,
                "height": height,
            }
        });

        let resp = self
            .client
            .post(self.model_url())
            .bearer_auth(&self.api_token)
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

        // Error payloads can arrive with a 200 and a JSON content type
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.starts_with("application/json") {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::InvalidResponse(format!(
                "expected image bytes, got JSON: {}",
                text
            )));
        }

        let format = if content_type.starts_with("image/jpeg") {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        };

        let data = resp.bytes().await?.to_vec();
        if data.is_empty() {
            return Err(ProviderError::InvalidResponse("empty image body".into()));
        }

        Ok(Artifact::Bytes { data, format })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.model_url()).send().await {
            // 503 = model cold-loading: the endpoint itself is up
            Ok(resp) => resp.status().is_success() || resp.status().as_u16() == 503,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::GenerationRequest;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> HuggingFaceProvider {
        HuggingFaceProvider::new(
            "hf_test_token".into(),
            "test/model".into(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    #[test]
    fn test_identity() {
        let provider = HuggingFaceProvider::new(
            "hf_test".into(),
            DEFAULT_HF_MODEL.into(),
            Duration::from_secs(30),
        );
        assert_eq!(provider.id(), "huggingface");
        assert_eq!(provider.priority(), 2);
        assert_eq!(provider.timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_generate_sends_bearer_and_returns_png() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test/model"))
            .and(bearer_token("hf_test_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4E, 0x47]),
            )
            .mount(&server)
            .await;

        let artifact = provider(&server)
            .generate("red dress", &GenerationRequest::new("x").hints)
            .await
            .unwrap();
        match artifact {
            Artifact::Bytes { format, data } => {
                assert_eq!(format, ImageFormat::Png);
                assert_eq!(data.len(), 4);
            }
            other => panic!("unexpected artifact: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_model_loading_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string("{\"error\":\"Model is loading\"}"),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate("red dress", &GenerationRequest::new("x").hints)
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("loading"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_body_with_success_status_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"error\":\"quota exceeded\"}", "application/json"),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .generate("red dress", &GenerationRequest::new("x").hints)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_health_check_treats_cold_model_as_up() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/test/model"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(provider(&server).health_check().await);
    }
}
