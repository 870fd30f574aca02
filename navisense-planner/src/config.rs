//! Planner configuration: service endpoint, timeout and loader pacing.
//!
//! Layered as embedded defaults, then an optional JSON file, then the
//! environment. Command-line overrides are applied by the caller.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{API_BASE_ENV_VAR, DEFAULT_API_BASE, GENERATE_PLAN_PATH};
use crate::loader::LoaderTiming;

const DEFAULT_PLANNER_DATA: &str = include_str!("../static/data/planner.json");
const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("api base must be an http(s) URL, got {0:?}")]
    InvalidBase(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub loader: LoaderTiming,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            loader: LoaderTiming::default(),
        }
    }
}

impl PlannerConfig {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_PLANNER_DATA).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `NAVISENSE_API_BASE` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBase`] for a non-http value.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::apply_env`] with an explicit lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBase`] for a non-http value.
    pub fn apply_env_with<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_BASE_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            Some(base) => {
                log::debug!("{API_BASE_ENV_VAR} overrides api base");
                self.with_api_base(&base)
            }
            None => Ok(self),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBase`] unless `base` starts with
    /// `http://` or `https://`.
    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        let base = base.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBase(base.to_string()));
        }
        self.api_base = base.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn generate_url(&self) -> String {
        format!("{}{GENERATE_PLAN_PATH}", self.api_base.trim_end_matches('/'))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_match_constants() {
        let cfg = PlannerConfig::load_from_static();
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.generate_url(), "http://localhost:8000/generate-plan");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_override_wins_and_is_checked() {
        let cfg = PlannerConfig::default()
            .apply_env_with(|_| Some("https://plans.example.com/".to_string()))
            .unwrap();
        assert_eq!(cfg.generate_url(), "https://plans.example.com/generate-plan");

        let unchanged = PlannerConfig::default().apply_env_with(|_| None).unwrap();
        assert_eq!(unchanged.api_base, DEFAULT_API_BASE);

        assert!(matches!(
            PlannerConfig::default().apply_env_with(|_| Some("ftp://x".to_string())),
            Err(ConfigError::InvalidBase(_))
        ));
    }

    #[test]
    fn reads_partial_file() {
        let dir = std::env::temp_dir().join(format!("navisense-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("planner.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"request_timeout_secs": 5, "loader": {{"settle_ms": 0}}}}"#).unwrap();
        let cfg = PlannerConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.request_timeout_secs, 5);
        assert_eq!(cfg.loader.settle_ms, 0);
        assert_eq!(cfg.loader.step_max_ms, 1_300);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PlannerConfig::from_json_file(Path::new("/nonexistent/planner.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/planner.json"));
    }
}
