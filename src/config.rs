//! Pipeline configuration
//!
//! Defaults cover a backend on localhost. A JSON file or environment
//! variables override individual fields.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Env var overriding [`BackendConfig::base_url`]
pub const ENV_BACKEND_URL: &str = "PIPELINE_BACKEND_URL";
/// Env var overriding [`BackendConfig::timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "PIPELINE_TIMEOUT_SECS";
/// Env var overriding [`PipelineConfig::preview_chars`]
pub const ENV_PREVIEW_CHARS: &str = "PIPELINE_PREVIEW_CHARS";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum characters of text shown in a log entry preview
    pub preview_chars: usize,
    pub backend: BackendConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preview_chars: 50,
            backend: BackendConfig::default(),
        }
    }
}

/// HTTP backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Per-request timeout; chat generation can take minutes on local models
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PipelineConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment or test map)
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.backend.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        if let Some(chars) = lookup(ENV_PREVIEW_CHARS) {
            self.preview_chars = chars
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_PREVIEW_CHARS))?;
        }
        Ok(self)
    }
}
