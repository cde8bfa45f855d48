//! Optional `config.toml` with the question source, theme and log level.
//!
//! A missing or empty file yields `Config::default()`. Command-line flags are
//! applied on top by the binary.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
/// Largest batch the trivia API serves in one request.
pub const MAX_AMOUNT: u32 = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint queried once at startup.
    pub api_url: String,
    /// Number of questions to request (1..=50).
    pub amount: u32,
    /// Theme name (dracula, solarized, gruvbox, everforest_light).
    pub theme: String,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            amount: MAX_AMOUNT,
            theme: "dracula".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Config = toml::from_str(content)?;
        config.amount = clamp_amount(config.amount);
        Ok(config)
    }

    /// Full request URL, e.g. `https://opentdb.com/api.php?amount=50`.
    pub fn request_url(&self) -> String {
        let separator = if self.api_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}amount={}",
            self.api_url,
            separator,
            clamp_amount(self.amount)
        )
    }
}

pub fn clamp_amount(amount: u32) -> u32 {
    amount.clamp(1, MAX_AMOUNT)
}
