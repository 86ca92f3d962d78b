//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/stipend/config/stipend.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top of whichever file was used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::report::DEFAULT_DISPLAY_THRESHOLD;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/stipend.toml");

/// Settings for the remote advice endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceConfig {
    /// Base URL of an OpenAI-compatible server
    pub host: String,
    pub model: String,
    /// Upper bound on a single remote call
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Bearer credential; never read from the config file
    pub api_key: Option<String>,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            host: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout: Duration::from_secs(15),
            max_tokens: 500,
            temperature: 0.7,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub display_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            display_threshold: DEFAULT_DISPLAY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub advice: AdviceConfig,
    pub report: ReportConfig,
}

impl Config {
    /// Load from the default override location (or embedded defaults),
    /// then apply environment variables
    pub fn load() -> Result<Self> {
        let mut config = load_config(None)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit override path, then apply environment variables
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = load_config(Some(path))?;
        config.apply_env();
        Ok(config)
    }

    /// Embedded defaults only (no files, no environment)
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup (empty values are ignored)
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("STIPEND_ADVICE_HOST") {
            self.advice.host = host.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("STIPEND_ADVICE_MODEL") {
            self.advice.model = model;
        }
        if let Some(secs) = get("STIPEND_ADVICE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.advice.timeout = Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(value = %secs, "Ignoring invalid STIPEND_ADVICE_TIMEOUT_SECS")
                }
            }
        }
        if let Some(key) = get("STIPEND_ADVICE_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.advice.api_key = Some(key);
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("stipend").join("config").join("stipend.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    advice: Option<RawAdvice>,
    report: Option<RawReport>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAdvice {
    host: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReport {
    display_threshold: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(advice) = raw.advice {
        if let Some(host) = advice.host {
            config.advice.host = host.trim_end_matches('/').to_string();
        }
        if let Some(model) = advice.model {
            config.advice.model = model;
        }
        if let Some(secs) = advice.timeout_secs {
            config.advice.timeout = Duration::from_secs(secs);
        }
        if let Some(max_tokens) = advice.max_tokens {
            config.advice.max_tokens = max_tokens;
        }
        if let Some(temperature) = advice.temperature {
            config.advice.temperature = temperature;
        }
    }

    if let Some(report) = raw.report {
        if let Some(threshold) = report.display_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(Error::Config(format!(
                    "display_threshold must be a non-negative number (got {})",
                    threshold
                )));
            }
            config.report.display_threshold = threshold;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = Config::embedded().unwrap();
        assert_eq!(config.advice.model, "gpt-3.5-turbo");
        assert_eq!(config.advice.timeout, Duration::from_secs(15));
        assert_eq!(config.report.display_threshold, 20.0);
        assert!(config.advice.api_key.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
[advice]
model = "llama3.2"
"#,
        )
        .unwrap();
        assert_eq!(config.advice.model, "llama3.2");
        assert_eq!(config.advice.host, "https://api.openai.com");
        assert_eq!(config.report.display_threshold, DEFAULT_DISPLAY_THRESHOLD);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = parse_config(
            r#"
[advice]
modle = "typo"
"#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = parse_config("[report]\ndisplay_threshold = -1.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stipend.toml");
        fs::write(
            &path,
            "[advice]\nhost = \"http://localhost:8080/\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.advice.host, "http://localhost:8080");
        assert_eq!(config.advice.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_override_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::embedded().unwrap());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STIPEND_ADVICE_HOST", "http://127.0.0.1:9999/"),
            ("STIPEND_ADVICE_MODEL", "gpt-4o-mini"),
            ("STIPEND_ADVICE_TIMEOUT_SECS", "2"),
            ("OPENAI_API_KEY", "sk-test"),
        ]);
        let mut config = Config::default();
        config.apply_env_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.advice.host, "http://127.0.0.1:9999");
        assert_eq!(config.advice.model, "gpt-4o-mini");
        assert_eq!(config.advice.timeout, Duration::from_secs(2));
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_stipend_key_wins_over_openai_key() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STIPEND_ADVICE_API_KEY", "sk-stipend"),
            ("OPENAI_API_KEY", "sk-openai"),
        ]);
        let mut config = Config::default();
        config.apply_env_from(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.advice.api_key.as_deref(), Some("sk-stipend"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env_from(|k| (k == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert!(config.advice.api_key.is_none());
    }
}
