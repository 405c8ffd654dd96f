//! Board configuration loaded from TOML with environment overrides.
//!
//! Lookup order: an explicit path, then `./projectflow.toml` when present,
//! then built-in defaults. Non-empty `PROJECTFLOW_*` variables override the
//! file afterwards.

use crate::board::domain::{BoardContext, BoardDomainError, BoardFeatures, ProjectId, TeamId};
use crate::board::services::BoardSettings;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "projectflow.toml";

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "PROJECTFLOW_API_URL";
/// Overrides `api.access_token`.
pub const ENV_ACCESS_TOKEN: &str = "PROJECTFLOW_ACCESS_TOKEN";
/// Overrides `project_id`.
pub const ENV_PROJECT_ID: &str = "PROJECTFLOW_PROJECT_ID";
/// Overrides `logging.level`.
pub const ENV_LOG: &str = "PROJECTFLOW_LOG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`BoardConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override holds an unusable value.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// No project is configured.
    #[error("project_id is not configured (set it in the config file or PROJECTFLOW_PROJECT_ID)")]
    MissingProjectId,

    /// A configured identifier is invalid.
    #[error(transparent)]
    Identifier(#[from] BoardDomainError),
}

/// Remote API settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the task service.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
}

impl ApiConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9090".to_owned(),
            timeout_ms: 10_000,
            access_token: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// A fetch limit section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum number of commits to request.
    pub limit: u32,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Recommendation refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Refresh recommendations after each confirmed single mutation.
    pub refresh_after_mutation: bool,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            refresh_after_mutation: true,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            ansi: true,
        }
    }
}

/// Complete board configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Project the board shows.
    pub project_id: Option<u64>,
    /// Team the project belongs to.
    pub team_id: Option<u64>,
    /// Commit fetch settings.
    pub commits: LimitConfig,
    /// Single-task evaluation settings.
    pub evaluation: LimitConfig,
    /// Optional workflows.
    pub features: BoardFeatures,
    /// Recommendation refresh settings.
    pub recommendations: RecommendationConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl BoardConfig {
    /// Loads configuration and applies process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(explicit) => Self::from_file(explicit)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Reads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies overrides read through `lookup`. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when the project override is not a
    /// positive integer.
    pub fn apply_env_overrides<L>(&mut self, lookup: L) -> Result<(), ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(ENV_API_URL) {
            self.api.base_url = url.trim().to_owned();
        }
        if let Some(token) = read(ENV_ACCESS_TOKEN) {
            self.api.access_token = Some(token.trim().to_owned());
        }
        if let Some(raw) = read(ENV_PROJECT_ID) {
            let parsed = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: ENV_PROJECT_ID,
                    value: raw.clone(),
                })?;
            self.project_id = Some(parsed);
        }
        if let Some(level) = read(ENV_LOG) {
            self.logging.level = level.trim().to_owned();
        }
        Ok(())
    }

    /// Builds the board context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProjectId`] when no project is set, or
    /// [`ConfigError::Identifier`] for a zero identifier.
    pub fn context(&self) -> Result<BoardContext, ConfigError> {
        let raw = self.project_id.ok_or(ConfigError::MissingProjectId)?;
        let mut context = BoardContext::new(ProjectId::new(raw)?);
        if let Some(team) = self.team_id {
            context = context.with_team(TeamId::new(team)?);
        }
        if let Some(token) = &self.api.access_token {
            context = context.with_access_token(token.clone());
        }
        Ok(context)
    }

    /// Returns the service tunables.
    #[must_use]
    pub const fn settings(&self) -> BoardSettings {
        BoardSettings {
            commit_limit: self.commits.limit,
            evaluation_limit: self.evaluation.limit,
            refresh_after_mutation: self.recommendations.refresh_after_mutation,
        }
    }
}
