use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Accent color picked by the operator. Presentation only: it never takes
/// part in filtering or aggregation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Pink,
    Yellow,
    Purple,
    Blue,
}

/// Configuration for a directory session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Endpoint serving the user directory payload
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Timeout for the ingestion request in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Quiet period before a typed name pattern takes effect, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Number of filter combinations whose visible set is kept around
    #[serde(default = "default_filter_cache_size")]
    pub filter_cache_size: usize,

    /// Initial state of the "highlight oldest per city" toggle
    #[serde(default)]
    pub highlight_oldest: bool,

    /// Initial theme color
    #[serde(default)]
    pub theme: ThemeColor,
}

fn default_source_url() -> String {
    "https://dummyjson.com/users".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_debounce_ms() -> u64 {
    1_000
}

fn default_filter_cache_size() -> usize {
    32
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            request_timeout_ms: default_request_timeout_ms(),
            debounce_ms: default_debounce_ms(),
            filter_cache_size: default_filter_cache_size(),
            highlight_oldest: false,
            theme: ThemeColor::default(),
        }
    }
}

impl DirectoryConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.source_url.trim().is_empty() {
            return Err("source_url must not be empty".to_string());
        }

        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be > 0".to_string());
        }

        if self.debounce_ms == 0 {
            return Err("debounce_ms must be > 0".to_string());
        }

        if self.filter_cache_size == 0 {
            return Err("filter_cache_size must be > 0".to_string());
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_config_valid() {
        let config = DirectoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(1000));
        assert_eq!(config.theme, ThemeColor::Pink);
        assert!(!config.highlight_oldest);
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = DirectoryConfig::default();
        config.debounce_ms = 0;
        assert!(config.validate().is_err());

        let mut config = DirectoryConfig::default();
        config.filter_cache_size = 0;
        assert!(config.validate().is_err());

        let mut config = DirectoryConfig::default();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = DirectoryConfig::default();
        config.source_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DirectoryConfig =
            serde_json::from_str(r#"{"debounce_ms": 250, "theme": "purple"}"#).unwrap();

        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.theme, ThemeColor::Purple);
        assert_eq!(config.filter_cache_size, 32);
        assert_eq!(config.source_url, "https://dummyjson.com/users");
    }

    #[test]
    fn test_theme_names() {
        let names: Vec<String> = ThemeColor::iter()
            .map(|color| color.as_ref().to_string())
            .collect();
        assert_eq!(names, vec!["pink", "yellow", "purple", "blue"]);
        assert_eq!(ThemeColor::Blue.to_string(), "blue");
        assert_eq!(ThemeColor::from_str("blue").unwrap(), ThemeColor::Blue);
        assert!(ThemeColor::from_str("green").is_err());
    }
}
