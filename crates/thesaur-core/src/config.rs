//! Thesaur configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file (`$THESAUR_CONFIG`, else ~/.config/thesaur/thesaur.toml)
//! - environment variables (THESAUR_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use thesaur_core::config::ThesaurConfig;
//!
//! // Load from the config file or fall back to env vars
//! let config = ThesaurConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = ThesaurConfig::from_file(std::path::Path::new("thesaur.toml")).expect("Failed to load");
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::defaults;
use crate::error::{Error, Result};

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"));

/// Triple store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SPARQL endpoint URL (query and update share the repository URL).
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::SPARQL_ENDPOINT.to_string(),
            timeout_secs: defaults::SPARQL_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::Config("store endpoint cannot be empty".to_string()));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(Error::Config(format!(
                "store endpoint must start with http:// or https://, got: {}",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("store timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Search and highlight settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_page_size: i64,
    pub max_occurrence_width: usize,
    pub max_context_width: usize,
    pub highlight_pre_tag: String,
    pub highlight_post_tag: String,
    /// Language priority for labels, most preferred first.
    pub languages: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: defaults::PAGE_SIZE_SEARCH,
            max_occurrence_width: defaults::HIGHLIGHT_MAX_OCCURRENCE_WIDTH,
            max_context_width: defaults::HIGHLIGHT_MAX_CONTEXT_WIDTH,
            highlight_pre_tag: defaults::HIGHLIGHT_PRE_TAG.to_string(),
            highlight_post_tag: defaults::HIGHLIGHT_POST_TAG.to_string(),
            languages: defaults::LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size <= 0 {
            return Err(Error::Config(format!(
                "search default_page_size must be positive, got {}",
                self.default_page_size
            )));
        }
        check_highlight_widths(self.max_occurrence_width, self.max_context_width)
    }
}

/// Checks `max_occurrence_width - 2 * max_context_width >= 1`.
pub fn check_highlight_widths(max_occurrence_width: usize, max_context_width: usize) -> Result<()> {
    let reserved = max_context_width.saturating_mul(2);
    if max_occurrence_width <= reserved {
        return Err(Error::Config(format!(
            "max_occurrence_width ({}) must exceed twice max_context_width ({})",
            max_occurrence_width, max_context_width
        )));
    }
    Ok(())
}

/// Collator cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollationConfig {
    pub cache_size: usize,
}

impl Default for CollationConfig {
    fn default() -> Self {
        Self {
            cache_size: defaults::COLLATOR_CACHE_SIZE,
        }
    }
}

/// Main thesaur configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThesaurConfig {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub collation: CollationConfig,
}

impl ThesaurConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/thesaur/thesaur.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("thesaur");
        path.push("thesaur.toml");
        path
    }

    /// Load configuration from `$THESAUR_CONFIG` or the default path,
    /// falling back to environment variables when no file exists.
    pub fn load() -> Result<Self> {
        if let Ok(explicit) = env::var(defaults::ENV_CONFIG_PATH) {
            let path = PathBuf::from(explicit);
            info!("Loading thesaur config from: {}", path.display());
            return Self::from_file(&path);
        }

        let path = Self::default_config_path();
        if path.exists() {
            info!("Loading thesaur config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text, substituting `${VAR}` placeholders first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over the defaults.
    ///
    /// Unparseable numeric values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = env::var(defaults::ENV_SPARQL_ENDPOINT) {
            config.store.endpoint = endpoint;
        }
        if let Some(secs) = env::var(defaults::ENV_SPARQL_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.store.timeout_secs = secs;
        }
        if let Some(size) = env::var(defaults::ENV_PAGE_SIZE)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.search.default_page_size = size;
        }
        if let Ok(languages) = env::var(defaults::ENV_LANGUAGES) {
            let parsed: Vec<String> = languages
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.search.languages = parsed;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.search.validate()?;
        if self.collation.cache_size == 0 {
            return Err(Error::Config(
                "collation cache_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    ///
    /// Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ThesaurConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.languages, vec!["fr", "en"]);
        assert_eq!(config.store.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_toml_str_full() {
        let config = ThesaurConfig::from_toml_str(
            r#"
            [store]
            endpoint = "https://sparql.example.org/repositories/thes"
            timeout_secs = 5

            [search]
            default_page_size = 50
            max_occurrence_width = 40
            max_context_width = 10
            highlight_pre_tag = "<em>"
            highlight_post_tag = "</em>"
            languages = ["en"]

            [collation]
            cache_size = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.store.endpoint, "https://sparql.example.org/repositories/thes");
        assert_eq!(config.store.timeout_secs, 5);
        assert_eq!(config.search.default_page_size, 50);
        assert_eq!(config.search.highlight_pre_tag, "<em>");
        assert_eq!(config.search.languages, vec!["en"]);
        assert_eq!(config.collation.cache_size, 4);
    }

    #[test]
    fn test_from_toml_str_partial_uses_defaults() {
        let config = ThesaurConfig::from_toml_str("[store]\ntimeout_secs = 7\n").unwrap();
        assert_eq!(config.store.timeout_secs, 7);
        assert_eq!(config.store.endpoint, defaults::SPARQL_ENDPOINT);
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_invalid_highlight_widths_rejected() {
        let err = ThesaurConfig::from_toml_str(
            "[search]\nmax_occurrence_width = 20\nmax_context_width = 10\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_check_highlight_widths() {
        assert!(check_highlight_widths(21, 10).is_ok());
        assert!(check_highlight_widths(20, 10).is_err());
        assert!(check_highlight_widths(0, 0).is_err());
        assert!(check_highlight_widths(1, 0).is_ok());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = ThesaurConfig::from_toml_str("[store]\nendpoint = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = ThesaurConfig::from_toml_str("[search]\ndefault_page_size = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_cache_size_rejected() {
        let err = ThesaurConfig::from_toml_str("[collation]\ncache_size = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ThesaurConfig::from_toml_str("[store\nendpoint =").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nendpoint = \"http://localhost:7200/repositories/t\"").unwrap();

        let config = ThesaurConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store.endpoint, "http://localhost:7200/repositories/t");
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = ThesaurConfig::from_file(Path::new("/nonexistent/thesaur.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_env_var_substitution_with_value() {
        let content = "endpoint = \"${TEST_THESAUR_SUBSTITUTION_VAR}\"";

        env::set_var("TEST_THESAUR_SUBSTITUTION_VAR", "http://sub.example.org");
        let result = ThesaurConfig::substitute_env_vars(content);
        env::remove_var("TEST_THESAUR_SUBSTITUTION_VAR");

        assert_eq!(result, "endpoint = \"http://sub.example.org\"");
    }

    #[test]
    fn test_env_var_substitution_missing() {
        let content = "endpoint = \"${NONEXISTENT_THESAUR_VAR_12345}\"";
        let result = ThesaurConfig::substitute_env_vars(content);
        assert_eq!(result, content);
    }

    #[test]
    fn test_default_config_path() {
        let path = ThesaurConfig::default_config_path();
        assert!(path.ends_with("thesaur/thesaur.toml"));
    }

    #[test]
    fn test_serialize_roundtrips_through_toml() {
        let config = ThesaurConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("[store]"));
        let parsed = ThesaurConfig::from_toml_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
