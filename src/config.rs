//! Library configuration.
//!
//! Credentials come from the environment; their presence alone decides
//! provider enablement, so a missing key disables a provider without any
//! startup error. An optional TOML file supplies the non-secret knobs and
//! is loaded leniently: a missing or unparseable file falls back to
//! defaults with a warning.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::{ProviderConfig, PROVIDERS};

/// Top-level generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Root directory for persisted artifacts and sidecar metadata.
    pub storage_root: PathBuf,
    /// TTL for cached successful results.
    pub success_ttl_secs: u64,
    /// TTL for cached placeholder (all-failed) results. Kept short so dead
    /// providers are retried soon.
    pub placeholder_ttl_secs: u64,
    pub providers: ProviderSettings,
}

/// Per-provider settings. Credentials are never written back to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub pollinations_base_url: String,
    pub pollinations_disabled: bool,
    pub pollinations_timeout_secs: u64,

    #[serde(skip_serializing)]
    pub huggingface_token: Option<String>,
    pub huggingface_model: String,
    pub huggingface_timeout_secs: u64,

    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_timeout_secs: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        let storage_root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lookforge")
            .join("generated");
        Self {
            storage_root,
            success_ttl_secs: 24 * 60 * 60,
            placeholder_ttl_secs: 5 * 60,
            providers: ProviderSettings::default(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            pollinations_base_url: crate::providers::DEFAULT_POLLINATIONS_URL.to_string(),
            pollinations_disabled: false,
            pollinations_timeout_secs: 20,
            huggingface_token: None,
            huggingface_model: crate::providers::DEFAULT_HF_MODEL.to_string(),
            huggingface_timeout_secs: 30,
            openai_api_key: None,
            openai_model: crate::providers::DEFAULT_OPENAI_MODEL.to_string(),
            openai_timeout_secs: 60,
        }
    }
}

impl GenConfig {
    /// Load from `~/.config/lookforge/config.toml`, then overlay environment
    /// variables. Returns defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lookforge")
            .join("config.toml")
    }

    /// Overlay environment variables onto this configuration. Credentials
    /// only exist in the environment.
    pub fn apply_env(&mut self) {
        if let Ok(root) = std::env::var("LOOKFORGE_STORAGE_ROOT") {
            self.storage_root = PathBuf::from(root);
        }
        if let Some(secs) = env_u64("LOOKFORGE_SUCCESS_TTL_SECS") {
            self.success_ttl_secs = secs;
        }
        if let Some(secs) = env_u64("LOOKFORGE_PLACEHOLDER_TTL_SECS") {
            self.placeholder_ttl_secs = secs;
        }

        if let Ok(url) = std::env::var("POLLINATIONS_BASE_URL") {
            self.providers.pollinations_base_url = url;
        }
        if env_flag("LOOKFORGE_POLLINATIONS_DISABLED") {
            self.providers.pollinations_disabled = true;
        }
        if let Ok(token) = std::env::var("HUGGINGFACE_API_TOKEN") {
            if !token.trim().is_empty() {
                self.providers.huggingface_token = Some(token);
            }
        }
        if let Ok(model) = std::env::var("LOOKFORGE_HF_MODEL") {
            self.providers.huggingface_model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.providers.openai_api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("LOOKFORGE_OPENAI_MODEL") {
            self.providers.openai_model = model;
        }
    }

    pub fn success_ttl(&self) -> Duration {
        Duration::from_secs(self.success_ttl_secs)
    }

    pub fn placeholder_ttl(&self) -> Duration {
        Duration::from_secs(self.placeholder_ttl_secs)
    }

    /// Adapter configurations for every provider whose credentials are
    /// present, in canonical priority order.
    pub fn enabled_provider_configs(&self) -> Vec<ProviderConfig> {
        let mut configs = Vec::new();
        for meta in PROVIDERS {
            match meta.id {
                "pollinations" if !self.providers.pollinations_disabled => {
                    configs.push(ProviderConfig::Pollinations {
                        base_url: self.providers.pollinations_base_url.clone(),
                        timeout_secs: self.providers.pollinations_timeout_secs,
                    });
                }
                "huggingface" => {
                    if let Some(token) = &self.providers.huggingface_token {
                        configs.push(ProviderConfig::HuggingFace {
                            api_token: token.clone(),
                            model: self.providers.huggingface_model.clone(),
                            timeout_secs: self.providers.huggingface_timeout_secs,
                        });
                    }
                }
                "openai" => {
                    if let Some(key) = &self.providers.openai_api_key {
                        configs.push(ProviderConfig::OpenAi {
                            api_key: key.clone(),
                            model: self.providers.openai_model.clone(),
                            timeout_secs: self.providers.openai_timeout_secs,
                        });
                    }
                }
                _ => {}
            }
        }
        configs
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
