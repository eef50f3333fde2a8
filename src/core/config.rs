//! Application configuration management
//!
//! Non-secret settings come from an optional TOML file; provider API keys
//! come from the process environment only. Everything is validated at
//! startup so a misconfigured server never binds.

use crate::core::constants::{defaults, env};
use crate::core::provider::ProviderKind;
use crate::verdict::ConfidenceRanges;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default server port
const DEFAULT_PORT: u16 = 8082;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSection {
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

/// Upstream settings for one provider. Keys never live here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl ProviderSettings {
    fn gemini_defaults() -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            model: defaults::GEMINI_MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }

    fn perplexity_defaults() -> Self {
        Self {
            base_url: defaults::PERPLEXITY_BASE_URL.to_string(),
            model: defaults::PERPLEXITY_MODEL.to_string(),
            temperature: defaults::TEMPERATURE,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }
}

/// Partial provider section; unset fields fall back to the vendor defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl ProviderSection {
    fn resolve(self, defaults: ProviderSettings) -> ProviderSettings {
        ProviderSettings {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_output_tokens: self.max_output_tokens.unwrap_or(defaults.max_output_tokens),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerdictSection {
    #[serde(default)]
    pub attach_to_response: bool,
    #[serde(default)]
    pub ranges: ConfidenceRanges,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_temperature() -> f32 {
    defaults::TEMPERATURE
}

fn default_max_output_tokens() -> u32 {
    defaults::MAX_OUTPUT_TOKENS
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub request: RequestSection,
    #[serde(default)]
    pub gemini: ProviderSection,
    #[serde(default)]
    pub perplexity: ProviderSection,
    #[serde(default)]
    pub verdict: VerdictSection,
}

/// Application configuration
///
/// Provider keys are optional here: a missing key only fails requests for
/// that provider, with a "not configured" error.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,

    pub gemini: ProviderSettings,
    pub perplexity: ProviderSettings,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Upstream request timeout in seconds
    pub request_timeout: u64,

    pub confidence_ranges: ConfidenceRanges,

    /// Include the classified verdict in successful proxy responses
    pub attach_verdict: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() { "<redacted>" } else { "<unset>" }
        }

        f.debug_struct("Config")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("perplexity_api_key", &redact(&self.perplexity_api_key))
            .field("gemini", &self.gemini)
            .field("perplexity", &self.perplexity)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("request_timeout", &self.request_timeout)
            .field("confidence_ranges", &self.confidence_ranges)
            .field("attach_verdict", &self.attach_verdict)
            .finish()
    }
}

impl Config {
    /// Build configuration from TOML text and an environment lookup.
    ///
    /// `HOST`, `PORT` and `LOG_LEVEL` from the environment override the file.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML cannot be parsed, `PORT` is not a number, or
    /// validation fails.
    pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toml_config: TomlConfig =
            toml::from_str(content).context("Failed to parse TOML configuration")?;

        // Empty values count as unset
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {raw}"))?,
            None => toml_config.server.port,
        };

        let config = Config {
            gemini_api_key: lookup(env::GEMINI_API_KEY),
            perplexity_api_key: lookup(env::PERPLEXITY_API_KEY),
            gemini: toml_config
                .gemini
                .resolve(ProviderSettings::gemini_defaults()),
            perplexity: toml_config
                .perplexity
                .resolve(ProviderSettings::perplexity_defaults()),
            host: lookup("HOST").unwrap_or(toml_config.server.host),
            port,
            log_level: lookup("LOG_LEVEL").unwrap_or(toml_config.server.log_level),
            request_timeout: toml_config.request.request_timeout,
            confidence_ranges: toml_config.verdict.ranges,
            attach_verdict: toml_config.verdict.attach_to_response,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the configuration is
    /// invalid.
    pub fn from_file<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&content, lookup)
    }

    /// Load configuration from the process environment.
    ///
    /// Reads `CONFIG_PATH` (default `config.toml`). The default file is
    /// optional; an explicitly named file must exist.
    pub fn from_env() -> Result<Self> {
        let lookup = |name: &str| std::env::var(name).ok();

        match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(path, lookup),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH, lookup)
            }
            Err(_) => Self::from_toml_str("", lookup),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Server port must be non-zero");
        }
        if self.request_timeout == 0 {
            bail!("request_timeout must be at least one second");
        }
        for kind in ProviderKind::ALL {
            let settings = self.settings(kind);
            if settings.base_url.trim().is_empty() {
                bail!("{} base_url must not be empty", kind.display_name());
            }
            if settings.model.trim().is_empty() {
                bail!("{} model must not be empty", kind.display_name());
            }
        }
        if let Some(name) = self.confidence_ranges.first_invalid() {
            bail!("Confidence range '{name}' must satisfy 0 <= min <= max <= 1");
        }
        Ok(())
    }

    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::Perplexity => self.perplexity_api_key.as_deref(),
        }
    }

    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Perplexity => &self.perplexity,
        }
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.api_key(kind).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn create_test_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            log_level = "debug"

            [request]
            request_timeout = 15

            [gemini]
            model = "gemini-1.5-pro"

            [perplexity]
            base_url = "http://localhost:4000"
            temperature = 0.2
            max_output_tokens = 120

            [verdict]
            attach_to_response = true

            [verdict.ranges.uncertain]
            min = 0.3
            max = 0.6
        "#
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = create_test_config();
        let config = Config::from_file(
            file.path(),
            env_of(&[("GEMINI_API_KEY", "g-key"), ("PERPLEXITY_API_KEY", "p-key")]),
        )
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout, 15);
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.base_url, defaults::GEMINI_BASE_URL);
        assert_eq!(config.perplexity.base_url, "http://localhost:4000");
        assert_eq!(config.perplexity.model, defaults::PERPLEXITY_MODEL);
        assert_eq!(config.perplexity.max_output_tokens, 120);
        assert!(config.attach_verdict);
        assert_eq!(config.confidence_ranges.uncertain.min, 0.3);
        assert_eq!(config.confidence_ranges.fake.min, 0.85);
        assert_eq!(config.api_key(ProviderKind::Gemini), Some("g-key"));
        assert_eq!(config.api_key(ProviderKind::Perplexity), Some("p-key"));
    }

    #[test]
    fn test_defaults_without_file_content() {
        let config = Config::from_toml_str("", env_of(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.gemini, ProviderSettings::gemini_defaults());
        assert_eq!(config.perplexity, ProviderSettings::perplexity_defaults());
        assert!(!config.attach_verdict);
        assert!(!config.is_configured(ProviderKind::Gemini));
        assert!(!config.is_configured(ProviderKind::Perplexity));
    }

    #[test]
    fn test_empty_key_counts_as_unset() {
        let config =
            Config::from_toml_str("", env_of(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key(ProviderKind::Gemini), None);
    }

    #[test]
    fn test_environment_overrides_server_section() {
        let config = Config::from_toml_str(
            "[server]\nport = 9000\nhost = \"127.0.0.1\"",
            env_of(&[("PORT", "9100"), ("HOST", "::1"), ("LOG_LEVEL", "warn")]),
        )
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "::1");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_port_env() {
        let err = Config::from_toml_str("", env_of(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(Config::from_toml_str("[request]\nrequest_timeout = 0", env_of(&[])).is_err());
        assert!(Config::from_toml_str("[server]\nport = 0", env_of(&[])).is_err());
        assert!(Config::from_toml_str("[gemini]\nmodel = \"\"", env_of(&[])).is_err());

        let inverted = "[verdict.ranges.real]\nmin = 0.9\nmax = 0.1";
        let err = Config::from_toml_str(inverted, env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("real"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("absent.toml"), env_of(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config =
            Config::from_toml_str("", env_of(&[("PERPLEXITY_API_KEY", "pplx-secret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("pplx-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("<unset>"));
    }
}
