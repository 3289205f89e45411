use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{FourthDownError, Result};

/// Environment variable naming the decision-service origin.
pub const API_URL_ENV: &str = "FOURTHDOWN_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8008";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
    /// Log destination while the terminal UI owns stdout/stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            log_file: None,
        }
    }
}

/// How out-of-order completions are applied to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPolicy {
    /// Every completion is applied as it resolves; the last to resolve wins.
    #[default]
    LastResolved,
    /// Completions from submissions older than the newest one are discarded.
    LatestSubmission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            apply_policy: ApplyPolicy::LastResolved,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ops: OpsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            FourthDownError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            FourthDownError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    /// Apply `FOURTHDOWN_API_URL` if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        self.with_base_url_override(value)
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.as_str();
        if url.is_empty() {
            return Err(FourthDownError::Configuration(
                "api.base_url must not be empty".into(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FourthDownError::Configuration(format!(
                "api.base_url must start with http:// or https:// (got {url})"
            )));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(FourthDownError::Configuration(
                "ui.tick_rate_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
