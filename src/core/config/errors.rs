//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration loading or validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a configuration file could not be read.
    #[error("configuration file could not be read: {path}")]
    FileNotReadable {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error indicating that a configuration file could not be parsed.
    #[error("configuration file could not be parsed: {message}")]
    ParseError { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating configuration values used by
/// the recognizer, such as cache bounds and image size limits.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a usize value is positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_positive_usize(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a u64 value is positive.
    fn validate_positive_u64(&self, value: u64, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a float value is positive and finite.
    fn validate_positive_f64(&self, value: f64, field_name: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0, got {value}"),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestValidator;
    impl ConfigValidator for TestValidator {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            TestValidator
        }
    }

    #[test]
    fn test_validate_positive_usize() {
        let validator = TestValidator;
        assert!(validator.validate_positive_usize(1, "max_size").is_ok());
        assert!(validator.validate_positive_usize(0, "max_size").is_err());
    }

    #[test]
    fn test_validate_positive_f64() {
        let validator = TestValidator;
        assert!(validator.validate_positive_f64(0.5, "timeout").is_ok());
        assert!(validator.validate_positive_f64(0.0, "timeout").is_err());
        assert!(validator.validate_positive_f64(-1.0, "timeout").is_err());
        assert!(validator.validate_positive_f64(f64::NAN, "timeout").is_err());
    }
}
