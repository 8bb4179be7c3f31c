//! Result materializer.
//!
//! Persists a winning artifact under the storage root together with a
//! sidecar metadata record, and returns a stable reference for the rest of
//! the application. The UI layer reads these paths directly.
//!
//! A write failure here is a hard error: a "success" that cannot be stored
//! is not actually a success.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::orchestrator::StableReference;
use crate::providers::Artifact;
use crate::request::{AspectRatio, GenerationRequest, QualityTier};

/// Sidecar record written next to each artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub prompt: String,
    pub provider_id: String,
    pub cost_usd: f64,
    pub latency_ms: u64,
    pub created_at: DateTime<Utc>,
    pub aspect: AspectRatio,
    pub quality: QualityTier,
    /// Set when the provider returned a remote reference instead of bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Marks diagnostic placeholder artifacts.
    #[serde(default)]
    pub degraded: bool,
}

/// Writes artifacts and their metadata under a well-known storage root.
#[derive(Debug, Clone)]
pub struct Materializer {
    root: PathBuf,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an artifact and its sidecar metadata.
    pub async fn persist(
        &self,
        artifact: &Artifact,
        request: &GenerationRequest,
        provider_id: &str,
        cost_usd: f64,
        latency_ms: u64,
    ) -> io::Result<StableReference> {
        self.store(artifact, request, provider_id, cost_usd, latency_ms, false)
            .await
    }

    /// Persist a placeholder artifact. Identical mechanics, flagged degraded
    /// in the sidecar so the UI can label it.
    pub async fn persist_placeholder(
        &self,
        artifact: &Artifact,
        request: &GenerationRequest,
    ) -> io::Result<StableReference> {
        self.store(artifact, request, "placeholder", 0.0, 0, true)
            .await
    }

    async fn store(
        &self,
        artifact: &Artifact,
        request: &GenerationRequest,
        provider_id: &str,
        cost_usd: f64,
        latency_ms: u64,
        degraded: bool,
    ) -> io::Result<StableReference> {
        tokio::fs::create_dir_all(&self.root).await?;

        let id = Uuid::new_v4().to_string();
        let (location, source_url) = match artifact {
            Artifact::Bytes { data, format } => {
                let path = self.root.join(format!("{}.{}", id, format.extension()));
                tokio::fs::write(&path, data).await?;
                (path.to_string_lossy().into_owned(), None)
            }
            // Remote references are recorded as-is; the bytes stay upstream
            Artifact::Remote { url } => (url.clone(), Some(url.clone())),
        };

        let metadata = ArtifactMetadata {
            id: id.clone(),
            prompt: request.prompt.clone(),
            provider_id: provider_id.to_string(),
            cost_usd,
            latency_ms,
            created_at: Utc::now(),
            aspect: request.hints.aspect,
            quality: request.hints.quality,
            source_url,
            degraded,
        };

        let metadata_path = self.root.join(format!("{}.json", id));
        let body = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        tokio::fs::write(&metadata_path, body).await?;

        tracing::debug!(
            artifact_id = %id,
            provider = provider_id,
            degraded,
            "persisted artifact"
        );

        Ok(StableReference {
            id,
            location,
            metadata_path: metadata_path.to_string_lossy().into_owned(),
        })
    }

    /// Read back the metadata for a persisted artifact.
    pub async fn read_metadata(&self, reference: &StableReference) -> io::Result<ArtifactMetadata> {
        let body = tokio::fs::read(&reference.metadata_path).await?;
        serde_json::from_slice(&body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
