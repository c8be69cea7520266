//! Configuration management for the recognition pipeline.
//!
//! This module provides the configuration types consumed by the recognizer,
//! JSON loading, environment-variable overrides, and validation.

pub mod errors;

pub use errors::{ConfigError, ConfigValidator};

use crate::core::constants::{
    DEFAULT_CACHE_MAX_SIZE, DEFAULT_CACHE_TTL_SECS, DEFAULT_CAPTCHA_TYPE, DEFAULT_MAX_IMAGE_SIZE,
    DEFAULT_MIN_IMAGE_SIZE, DEFAULT_RECOGNITION_TIMEOUT_SECS, DEFAULT_SLOW_THRESHOLD_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Top-level configuration for a [`CaptchaRecognizer`](crate::pipeline::CaptchaRecognizer).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Recognition input limits and defaults.
    pub recognition: RecognitionConfig,
    /// Result cache bounds.
    pub cache: CacheConfig,
    /// Performance reporting thresholds.
    pub performance: PerformanceConfig,
}

/// Recognition input limits and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Challenge type assumed when the caller does not specify one.
    pub default_type: String,
    /// Maximum accepted image payload in bytes.
    pub max_image_size: usize,
    /// Minimum accepted image payload in bytes.
    pub min_image_size: usize,
    /// Time budget in seconds, enforced by the engine collaborator.
    pub timeout: f64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            default_type: DEFAULT_CAPTCHA_TYPE.to_string(),
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            min_image_size: DEFAULT_MIN_IMAGE_SIZE,
            timeout: DEFAULT_RECOGNITION_TIMEOUT_SECS,
        }
    }
}

/// Result cache bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether recognition results are cached at all.
    pub enabled: bool,
    /// Maximum number of cached entries before LRU eviction.
    pub max_size: usize,
    /// Entry time-to-live in seconds.
    pub ttl: u64,
}

impl CacheConfig {
    /// Returns the configured TTL as a [`Duration`].
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: DEFAULT_CACHE_MAX_SIZE,
            ttl: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Performance reporting thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Successful recognitions slower than this many seconds are logged as slow.
    pub slow_threshold: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            slow_threshold: DEFAULT_SLOW_THRESHOLD_SECS,
        }
    }
}

impl RecognizerConfig {
    /// Parses a configuration from a JSON string.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileNotReadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    /// Applies environment-variable overrides on top of the current values.
    ///
    /// Recognized variables: `CAPTCHA_CACHE_ENABLED`, `CAPTCHA_CACHE_MAX_SIZE`,
    /// `CAPTCHA_CACHE_TTL`, `CAPTCHA_RECOGNITION_TIMEOUT`. Values that fail to
    /// parse are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(enabled) = env_parse::<bool>("CAPTCHA_CACHE_ENABLED") {
            self.cache.enabled = enabled;
        }
        if let Some(max_size) = env_parse::<usize>("CAPTCHA_CACHE_MAX_SIZE") {
            self.cache.max_size = max_size;
        }
        if let Some(ttl) = env_parse::<u64>("CAPTCHA_CACHE_TTL") {
            self.cache.ttl = ttl;
        }
        if let Some(timeout) = env_parse::<f64>("CAPTCHA_RECOGNITION_TIMEOUT") {
            self.recognition.timeout = timeout;
        }
    }
}

/// Reads and parses one environment variable, logging unparseable values.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

impl ConfigValidator for RecognitionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.max_image_size, "recognition.max_image_size")?;
        self.validate_positive_f64(self.timeout, "recognition.timeout")?;
        if self.min_image_size >= self.max_image_size {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "recognition.min_image_size ({}) must be below recognition.max_image_size ({})",
                    self.min_image_size, self.max_image_size
                ),
            });
        }
        if self.default_type.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "recognition.default_type must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

impl ConfigValidator for CacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_usize(self.max_size, "cache.max_size")?;
        self.validate_positive_u64(self.ttl, "cache.ttl")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

impl ConfigValidator for PerformanceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_f64(self.slow_threshold, "performance.slow_threshold")
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

impl ConfigValidator for RecognizerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.recognition.validate()?;
        self.cache.validate()?;
        self.performance.validate()?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = RecognizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.max_size, 1000);
        assert_eq!(config.cache.ttl, 3600);
        assert!(config.cache.enabled);
        assert_eq!(config.recognition.default_type, "text");
    }

    #[test]
    fn test_partial_json_keeps_section_defaults() {
        let config = RecognizerConfig::from_json_str(
            r#"{
                "cache": { "max_size": 64 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.cache.max_size, 64);
        // Unspecified fields and sections fall back to defaults
        assert_eq!(config.cache.ttl, 3600);
        assert_eq!(config.recognition.timeout, 30.0);
    }

    #[test]
    fn test_zero_bounds_are_rejected() {
        let mut config = RecognizerConfig::default();
        config.cache.max_size = 0;
        assert!(config.validate().is_err());

        let mut config = RecognizerConfig::default();
        config.cache.ttl = 0;
        assert!(config.validate().is_err());

        let mut config = RecognizerConfig::default();
        config.recognition.timeout = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_size_must_stay_below_max() {
        let mut config = RecognizerConfig::default();
        config.recognition.min_image_size = config.recognition.max_image_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cache": {{"ttl": 120, "enabled": false}}}}"#).unwrap();

        let config = RecognizerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.cache.ttl, 120);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_from_json_file_missing_path_errors() {
        let result = RecognizerConfig::from_json_file("/nonexistent/config.json");
        assert!(matches!(result, Err(ConfigError::FileNotReadable { .. })));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let result = RecognizerConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overrides_apply_and_ignore_garbage() {
        // No other test reads these variables
        std::env::set_var("CAPTCHA_CACHE_TTL", "900");
        std::env::set_var("CAPTCHA_CACHE_MAX_SIZE", "not-a-number");

        let mut config = RecognizerConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.cache.ttl, 900);
        assert_eq!(config.cache.max_size, DEFAULT_CACHE_MAX_SIZE);

        std::env::remove_var("CAPTCHA_CACHE_TTL");
        std::env::remove_var("CAPTCHA_CACHE_MAX_SIZE");
    }
}
