use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::{EyesError, Result};
use crate::guard;
use crate::server::DEFAULT_SERVER_URL;
use crate::types::{BatchDefaults, MatchLevel, SessionType};

pub const API_KEY_ENV: &str = "APPLITOOLS_API_KEY";
pub const SERVER_URL_ENV: &str = "APPLITOOLS_SERVER_URL";
pub const BRANCH_ENV: &str = "APPLITOOLS_BRANCH";
pub const PARENT_BRANCH_ENV: &str = "APPLITOOLS_PARENT_BRANCH";

/// Settings resolved once, before an [`crate::Eyes`] is built, and handed to
/// it as a plain value. Nothing downstream reads the process environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyesConfig {
    pub server_url: String,
    pub api_key: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub batch: BatchDefaults,
    pub branch_name: Option<String>,
    pub parent_branch_name: Option<String>,
    pub baseline_env_name: Option<String>,
    pub environment_name: Option<String>,
    pub host_os: Option<String>,
    pub host_app: Option<String>,
    pub session_type: SessionType,
    pub match_level: MatchLevel,
    pub ignore_caret: bool,
    /// Accept the first run of a test as its baseline.
    pub save_new_tests: bool,
    /// Replace the baseline with mismatching checkpoints.
    pub save_failed_tests: bool,
}

impl Default for EyesConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(300),
            batch: BatchDefaults::default(),
            branch_name: None,
            parent_branch_name: None,
            baseline_env_name: None,
            environment_name: None,
            host_os: None,
            host_app: None,
            session_type: SessionType::default(),
            match_level: MatchLevel::default(),
            ignore_caret: false,
            save_new_tests: true,
            save_failed_tests: false,
        }
    }
}

impl EyesConfig {
    /// Defaults overlaid with `APPLITOOLS_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Reads an optional TOML file, then applies the environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                toml::from_str(&raw).map_err(|e| {
                    EyesError::Config(format!("failed to parse {}: {e}", path.display()))
                })?
            }
            None => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server_url)?;

        if let Some(api_key) = self.api_key.as_deref() {
            guard::alphanumeric(api_key, "apiKey")
                .map_err(|e| EyesError::Config(e.to_string()))?;
        }

        if self.timeout.is_zero() {
            return Err(EyesError::Config("timeout must be greater than zero".into()));
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Some(url) = env_value(SERVER_URL_ENV) {
            self.server_url = url;
        }
        if let Some(key) = env_value(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(branch) = env_value(BRANCH_ENV) {
            self.branch_name = Some(branch);
        }
        if let Some(parent) = env_value(PARENT_BRANCH_ENV) {
            self.parent_branch_name = Some(parent);
        }

        let batch = BatchDefaults::from_env();
        if batch.id.is_some() {
            self.batch.id = batch.id;
        }
        if batch.name.is_some() {
            self.batch.name = batch.name;
        }
    }
}

/// Environment lookup that treats unset and empty the same way.
pub(crate) fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
