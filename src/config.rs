//! Configuration management for candidatefinder.
//!
//! All configuration is loaded from `./config/candidatefinder.toml`.
//! No hardcoded defaults exist in source code - all defaults are in the
//! config template embedded at build time.

use serde::Deserialize;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/candidatefinder.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/candidatefinder.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Configuration field '{field}' is out of range: {detail}")]
    OutOfRange { field: String, detail: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub rate_limit: RateLimitConfig,
    pub search: SearchConfig,
    pub enrich: EnrichConfig,
    pub run: RunConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the recruiting platform API
    pub base_url: String,
    pub user_agent: String,
    /// Hard timeout per request attempt
    pub request_timeout_secs: u64,
}

/// Retry and backoff configuration for outbound requests
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Extra attempts after the first failure (429 / network / timeout)
    pub max_retries: u32,
    /// Linear backoff increment: attempt N waits N * backoff_increment_ms
    pub backoff_increment_ms: u64,
}

impl RateLimitConfig {
    /// Delay before retrying after the given (1-indexed) failed attempt.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_increment_ms.saturating_mul(attempt as u64))
    }
}

/// Search shape configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Page size for search requests; the platform's practical maximum is 100
    pub per_page: u32,
    /// Default cap on the total result set
    pub total_cap: usize,
    /// Cap per company; 0 means no per-company cap
    pub per_company_cap: usize,
    /// History entries ending within this many days of the run start
    /// (or with no end date) count as recent
    pub recency_days: u32,
}

/// Enrichment throttling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    /// Detail calls are made in sequential batches of this size
    pub batch_size: usize,
    /// Throttle between individual detail calls
    pub item_delay_ms: u64,
    /// Throttle between batches
    pub batch_delay_ms: u64,
}

/// Wall-clock budget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Overall budget for one run, in seconds
    pub budget_secs: u64,
    /// Subtracted from the budget so results can still be delivered in time
    pub safety_margin_secs: u64,
}

impl RunConfig {
    /// Budget actually granted to the pipeline: the configured budget minus
    /// the delivery safety margin.
    pub fn effective_budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs.saturating_sub(self.safety_margin_secs))
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the embedded default configuration.
    pub fn embedded_defaults() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }

        let url = Url::parse(&self.http.base_url).map_err(|_| ConfigError::InvalidUrl {
            field: "http.base_url".to_string(),
            url: self.http.base_url.clone(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl {
                field: "http.base_url".to_string(),
                url: self.http.base_url.clone(),
            });
        }

        if self.search.per_page == 0 || self.search.per_page > 100 {
            return Err(ConfigError::OutOfRange {
                field: "search.per_page".to_string(),
                detail: format!("{} (must be 1..=100)", self.search.per_page),
            });
        }
        if self.search.total_cap == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "search.total_cap".to_string(),
            });
        }

        if self.enrich.batch_size == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "enrich.batch_size".to_string(),
            });
        }

        if self.run.budget_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "run.budget_secs".to_string(),
            });
        }
        if self.run.safety_margin_secs >= self.run.budget_secs {
            return Err(ConfigError::OutOfRange {
                field: "run.safety_margin_secs".to_string(),
                detail: format!(
                    "{} (must be smaller than run.budget_secs = {})",
                    self.run.safety_margin_secs, self.run.budget_secs
                ),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        io::stdin().is_terminal()
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("Configuration file not found. Create default config? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok(), "Default config should parse: {:?}", config.err());
    }

    #[test]
    fn test_default_config_validates() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.validate().is_ok(), "Default config should validate");
    }

    #[test]
    fn test_default_budget_leaves_safety_margin() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.run.effective_budget(), Duration::from_secs(50));
    }

    #[test]
    fn test_backoff_is_linear() {
        let config = RateLimitConfig {
            max_retries: 2,
            backoff_increment_ms: 1000,
        };
        assert_eq!(config.backoff_delay(0), Duration::ZERO);
        assert_eq!(config.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(3000));
    }

    #[test]
    fn test_rejects_oversized_page() {
        let mut config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.search.per_page = 500;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let mut config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.http.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        config.http.base_url = "ftp://api.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_margin_eating_whole_budget() {
        let mut config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.run.budget_secs = 10;
        config.run.safety_margin_secs = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = AppConfig::load_from_path(Path::new("./does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
