//! Page runtime configuration.
//!
//! Loaded from an optional YAML file. Every field has a default matching the
//! live site, so an empty file (or no file) reproduces stock behavior.
//!
//! ```yaml
//! site_name: EDEN Newspaper
//! page_url: https://eden-newspaper.cm/
//! mobile_breakpoint_px: 768
//! ticker:
//!   separator: " • "
//!   match_prefix_chars: 20
//! timings:
//!   notification_ttl: 5000
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Ticker click matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Decorative token stripped from ticker entry text.
    pub separator: String,
    /// How many leading characters of the entry must appear in a headline.
    pub match_prefix_chars: usize,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            separator: " • ".to_string(),
            match_prefix_chars: 20,
        }
    }
}

/// Timer delays in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub press: u64,
    pub logo_spin: u64,
    pub notification_ttl: u64,
    pub notification_exit: u64,
    pub dropdown_fade_in: u64,
    pub dropdown_hide: u64,
    pub load_more: u64,
    pub typewriter: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            press: 150,
            logo_spin: 300,
            notification_ttl: 5000,
            notification_exit: 500,
            dropdown_fade_in: 50,
            dropdown_hide: 300,
            load_more: 2000,
            typewriter: 100,
        }
    }
}

impl Timings {
    pub fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub site_name: String,
    /// Location reported to the share sheet and clipboard.
    pub page_url: String,
    /// Replacement content table (YAML records); the built-in one otherwise.
    pub content_path: Option<String>,
    /// Viewports at or below this width get `mobile-animations`.
    pub mobile_breakpoint_px: f64,
    /// Visible ratio at which an element animates in.
    pub animate_threshold: f64,
    pub parallax_rate: f64,
    pub parallax_factor: f64,
    /// Retype `h1` headings on load.
    pub typewriter_headings: bool,
    pub ticker: TickerConfig,
    pub timings: Timings,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            site_name: "EDEN Newspaper".to_string(),
            page_url: "https://eden-newspaper.cm/".to_string(),
            content_path: None,
            mobile_breakpoint_px: 768.0,
            animate_threshold: 0.1,
            parallax_rate: -0.5,
            parallax_factor: 0.1,
            typewriter_headings: false,
            ticker: TickerConfig::default(),
            timings: Timings::default(),
        }
    }
}

/// Semantic problems in an otherwise well-formed config file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidPageUrl(String),
    ZeroTickerPrefix,
    InvalidThreshold(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPageUrl(url) => write!(f, "page_url `{url}` is not an absolute URL"),
            ConfigError::ZeroTickerPrefix => write!(f, "ticker.match_prefix_chars must be at least 1"),
            ConfigError::InvalidThreshold(t) => {
                write!(f, "animate_threshold {t} must be between 0 and 1")
            }
        }
    }
}

impl Error for ConfigError {}

impl PageConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: PageConfig = if yaml.trim().is_empty() {
            PageConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(path).await?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(site = %config.site_name, "Loaded page configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page_url()?;
        if self.ticker.match_prefix_chars == 0 {
            return Err(ConfigError::ZeroTickerPrefix);
        }
        if !(0.0..=1.0).contains(&self.animate_threshold) {
            return Err(ConfigError::InvalidThreshold(self.animate_threshold));
        }
        Ok(())
    }

    pub fn page_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.page_url).map_err(|_| ConfigError::InvalidPageUrl(self.page_url.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_live_site() {
        let config = PageConfig::default();
        assert_eq!(config.mobile_breakpoint_px, 768.0);
        assert_eq!(config.ticker.match_prefix_chars, 20);
        assert_eq!(config.ticker.separator, " • ");
        assert_eq!(config.timings.press, 150);
        assert_eq!(config.timings.notification_ttl, 5000);
        assert_eq!(config.timings.notification_exit, 500);
        assert!(!config.typewriter_headings);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(PageConfig::from_yaml_str("").unwrap(), PageConfig::default());
        assert_eq!(PageConfig::from_yaml_str("  \n").unwrap(), PageConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = PageConfig::from_yaml_str(
            "mobile_breakpoint_px: 640\ntimings:\n  notification_ttl: 8000\n",
        )
        .unwrap();
        assert_eq!(config.mobile_breakpoint_px, 640.0);
        assert_eq!(config.timings.notification_ttl, 8000);
        assert_eq!(config.timings.notification_exit, 500);
        assert_eq!(config.site_name, "EDEN Newspaper");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PageConfig::from_yaml_str("page_url: not a url\n").is_err());
        assert!(PageConfig::from_yaml_str("ticker:\n  match_prefix_chars: 0\n").is_err());
        assert!(PageConfig::from_yaml_str("animate_threshold: 1.5\n").is_err());
        assert!(PageConfig::from_yaml_str("mobile_breakpoint_px: [1]\n").is_err());
    }

    #[test]
    fn test_page_url_parses() {
        let url = PageConfig::default().page_url().unwrap();
        assert_eq!(url.host_str(), Some("eden-newspaper.cm"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eden.yaml");
        std::fs::write(&path, "site_name: EDEN Weekend\ntypewriter_headings: true\n").unwrap();
        let config = PageConfig::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.site_name, "EDEN Weekend");
        assert!(config.typewriter_headings);
    }
}
