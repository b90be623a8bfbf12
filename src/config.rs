//! Harness configuration.
//!
//! [`crate::cli::merge_with_config`] layers built-in defaults, `PETSTORE_*`
//! environment variables and command-line flags into a [`Cli`]. This module
//! validates the merged values into the typed [`HarnessConfig`] every
//! scenario shares.

use crate::cli::Cli;
use camino::Utf8PathBuf;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Public pet-store deployment used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";
/// Placeholder store-manager key accepted by the public deployment.
pub const DEFAULT_API_KEY: &str = "special-key";
/// Overall per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Directory holding reference fixtures, relative to the working directory.
pub const DEFAULT_FIXTURES_DIR: &str = "fixtures/payloads";

// Names read by the environment layer of the configuration merge.

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "PETSTORE_BASE_URL";
/// Environment variable overriding the API key.
pub const API_KEY_ENV: &str = "PETSTORE_API_KEY";
/// Environment variable overriding the timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "PETSTORE_TIMEOUT_SECS";
/// Environment variable overriding the fixture directory.
pub const FIXTURES_DIR_ENV: &str = "PETSTORE_FIXTURES_DIR";
/// Environment variable naming a JSON-lines evidence log.
pub const EVIDENCE_LOG_ENV: &str = "PETSTORE_EVIDENCE_LOG";

/// Reasons a configuration value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("base URL '{value}' is invalid: {reason}")]
    InvalidBaseUrl {
        /// Rejected value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The base URL cannot carry path segments (for example `mailto:`).
    #[error("base URL '{value}' must be an http or https URL")]
    UnsupportedBaseUrl {
        /// Rejected value.
        value: String,
    },
    /// The timeout was zero seconds.
    #[error("timeout must be at least one second")]
    ZeroTimeout,
    /// The API key was empty.
    #[error("API key must not be empty")]
    EmptyApiKey,
    /// A configured path is not valid UTF-8.
    #[error("path '{path}' is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the rejected path.
        path: String,
    },
}

/// Immutable configuration shared by every scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    base_url: Url,
    api_key: String,
    timeout: Duration,
    fixtures_dir: Utf8PathBuf,
    evidence_log: Option<Utf8PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::from(DEFAULT_API_KEY),
            timeout: DEFAULT_TIMEOUT,
            fixtures_dir: Utf8PathBuf::from(DEFAULT_FIXTURES_DIR),
            evidence_log: None,
        }
    }
}

impl HarnessConfig {
    /// Validate merged command-line and environment values.
    ///
    /// Fields left unset keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a merged value is invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = &cli.base_url {
            config = config.with_base_url(url)?;
        }
        if let Some(key) = &cli.api_key {
            config = config.with_api_key(key.as_str())?;
        }
        if let Some(secs) = cli.timeout_secs {
            config = config.with_timeout(timeout_from_secs(secs)?);
        }
        if let Some(dir) = &cli.fixtures_dir {
            config = config.with_fixtures_dir(utf8_path(dir)?);
        }
        if let Some(path) = &cli.evidence_log {
            config = config.with_evidence_log(utf8_path(path)?);
        }
        Ok(config)
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `url` does not parse or cannot carry
    /// path segments.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Replace the store-manager API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] for an empty key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Result<Self, ConfigError> {
        let candidate = key.into();
        if candidate.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        self.api_key = candidate;
        Ok(self)
    }

    /// Replace the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the fixture directory.
    #[must_use]
    pub fn with_fixtures_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    /// Append evidence to a JSON-lines log at `path`.
    #[must_use]
    pub fn with_evidence_log(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.evidence_log = Some(path.into());
        self
    }

    /// Base URL every endpoint path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Store-manager API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Directory holding reference fixtures.
    #[must_use]
    pub fn fixtures_dir(&self) -> &camino::Utf8Path {
        &self.fixtures_dir
    }

    /// Optional JSON-lines evidence log.
    #[must_use]
    pub fn evidence_log(&self) -> Option<&camino::Utf8Path> {
        self.evidence_log.as_deref()
    }
}

#[expect(
    clippy::expect_used,
    reason = "the default base URL is a constant absolute URL"
)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL parses")
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|err| ConfigError::InvalidBaseUrl {
        value: value.to_owned(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedBaseUrl {
            value: value.to_owned(),
        });
    }
    Ok(url)
}

const fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }
    Ok(Duration::from_secs(secs))
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|raw| ConfigError::NonUtf8Path {
        path: raw.to_string_lossy().into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    fn unset_values_keep_public_defaults() {
        let config = HarnessConfig::from_cli(&Cli::default()).expect("defaults are valid");
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), DEFAULT_API_KEY);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.fixtures_dir().as_str(), DEFAULT_FIXTURES_DIR);
        assert!(config.evidence_log().is_none());
    }

    #[rstest]
    fn merged_values_populate_every_field() {
        let cli = Cli {
            base_url: Some(String::from("http://localhost:9000/api")),
            api_key: Some(String::from("manager-key")),
            timeout_secs: Some(5),
            fixtures_dir: Some(PathBuf::from("/srv/fixtures")),
            evidence_log: Some(PathBuf::from("target/evidence.jsonl")),
            ..Cli::default()
        };
        let config = HarnessConfig::from_cli(&cli).expect("valid values");
        assert_eq!(config.base_url().as_str(), "http://localhost:9000/api");
        assert_eq!(config.api_key(), "manager-key");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.fixtures_dir().as_str(), "/srv/fixtures");
        assert_eq!(
            config.evidence_log().map(camino::Utf8Path::as_str),
            Some("target/evidence.jsonl")
        );
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let cli = Cli {
            timeout_secs: Some(0),
            ..Cli::default()
        };
        assert_eq!(HarnessConfig::from_cli(&cli), Err(ConfigError::ZeroTimeout));
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:store@example.com")]
    #[case("ftp://example.com/v2")]
    fn rejects_unusable_base_urls(#[case] value: &str) {
        assert!(HarnessConfig::default().with_base_url(value).is_err());
        let cli = Cli {
            base_url: Some(value.to_owned()),
            ..Cli::default()
        };
        assert!(HarnessConfig::from_cli(&cli).is_err());
    }

    #[rstest]
    fn rejects_blank_api_key() {
        assert_eq!(
            HarnessConfig::default().with_api_key("  "),
            Err(ConfigError::EmptyApiKey)
        );
    }
}
