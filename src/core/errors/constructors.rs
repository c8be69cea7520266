//! Error constructor utilities for the recognition pipeline.
//!
//! This module provides ergonomic helper functions for creating CaptchaError
//! instances with appropriate context and error chaining, including the
//! reclassification boundary that turns raw I/O and decode failures into
//! taxonomy errors before they can escape the dispatcher.

use super::types::{BoxedCause, CaptchaError, OpaqueError};
use std::path::Path;

/// Implementation of CaptchaError with utility functions for creating errors.
impl CaptchaError {
    /// Creates an error for a challenge type with no registered processor.
    ///
    /// # Arguments
    ///
    /// * `requested` - The type the caller asked for.
    /// * `known_types` - The currently registered types.
    pub fn unsupported_captcha_type(
        requested: impl Into<String>,
        known_types: Vec<String>,
    ) -> Self {
        Self::UnsupportedCaptchaType {
            requested: requested.into(),
            known_types,
        }
    }

    /// Creates an error for an undecodable image payload.
    pub fn invalid_image_format(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidImageFormat {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an error for an image payload above the configured limit.
    pub fn image_too_large(size: usize, max_size: usize) -> Self {
        Self::ImageTooLarge { size, max_size }
    }

    /// Creates an error for an image payload below the configured minimum.
    pub fn image_too_small(size: usize, min_size: usize) -> Self {
        Self::ImageTooSmall { size, min_size }
    }

    /// Creates an error for a recognition that produced no usable result.
    pub fn recognition_failed(message: impl Into<String>) -> Self {
        Self::RecognitionFailed {
            message: message.into(),
        }
    }

    /// Creates an error for a recognition that exceeded its time budget.
    pub fn processing_timeout(timeout_secs: f64) -> Self {
        Self::ProcessingTimeout { timeout_secs }
    }

    /// Creates an error for structurally unusable image data.
    pub fn invalid_image_data(message: impl Into<String>) -> Self {
        Self::InvalidImageData {
            message: message.into(),
        }
    }

    /// Creates an error for an invalid caller-supplied parameter.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates an error for an invalid parameter with field context.
    ///
    /// # Arguments
    ///
    /// * `field` - The option key that failed validation.
    /// * `expected` - The expected shape of the value.
    /// * `actual` - The value that was supplied.
    pub fn invalid_parameter_with_context(field: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidParameter {
            message: format!("option '{field}' expected {expected}, but got {actual}"),
        }
    }

    /// Creates an error for a missing required parameter.
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Creates an error for a cache-internal anomaly.
    pub fn cache_error(message: impl Into<String>) -> Self {
        Self::CacheError {
            message: message.into(),
        }
    }

    /// Creates a filesystem error with optional path context.
    pub fn file_system(
        message: impl Into<String>,
        path: Option<&Path>,
        source: Option<BoxedCause>,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.map(Path::to_path_buf),
            source,
        }
    }

    /// Creates a network error.
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an error for a failed external collaborator.
    ///
    /// # Arguments
    ///
    /// * `service` - The collaborator that failed (e.g. the engine name).
    /// * `message` - What the collaborator reported.
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error for a failed external collaborator with its cause.
    pub fn external_service_with_cause(
        service: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an internal invariant-violation error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an unknown error wrapping an unexpected failure.
    ///
    /// The original failure's message is preserved in the cause chain so it
    /// survives into `to_value()` output.
    pub fn unknown(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unknown {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an unknown error from a bare message.
    pub fn unknown_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Unknown {
            source: Some(Box::new(OpaqueError(message.clone()))),
            message,
        }
    }

    /// Reclassifies an I/O failure into the taxonomy.
    ///
    /// Not-found and permission failures map to the filesystem system code;
    /// anything else surfaces as unknown with the original error preserved.
    ///
    /// # Arguments
    ///
    /// * `error` - The raw I/O error.
    /// * `path` - The path being accessed, when known.
    pub fn from_io(error: std::io::Error, path: Option<&Path>) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::file_system(
                match path {
                    Some(path) => format!("file not found: {}", path.display()),
                    None => "file not found".to_string(),
                },
                path,
                Some(Box::new(error)),
            ),
            ErrorKind::PermissionDenied => Self::file_system(
                match path {
                    Some(path) => format!("permission denied: {}", path.display()),
                    None => "permission denied".to_string(),
                },
                path,
                Some(Box::new(error)),
            ),
            _ => Self::unknown("unexpected I/O failure", error),
        }
    }
}

impl From<image::ImageError> for CaptchaError {
    fn from(error: image::ImageError) -> Self {
        Self::invalid_image_format("image payload could not be decoded", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::code;

    #[test]
    fn test_from_io_maps_not_found_to_file_system() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = CaptchaError::from_io(io, Some(Path::new("missing.png")));

        assert_eq!(error.code(), code::FILE_SYSTEM_ERROR);
        assert_eq!(error.details()["path"], "missing.png");
    }

    #[test]
    fn test_from_io_maps_permission_denied_to_file_system() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error = CaptchaError::from_io(io, None);
        assert_eq!(error.code(), code::FILE_SYSTEM_ERROR);
    }

    #[test]
    fn test_from_io_falls_back_to_unknown() {
        let io = std::io::Error::other("interrupted");
        let error = CaptchaError::from_io(io, None);

        assert_eq!(error.code(), code::UNKNOWN_ERROR);
        assert_eq!(error.cause().unwrap().to_string(), "interrupted");
    }

    #[test]
    fn test_invalid_parameter_with_context_formats_message() {
        let error =
            CaptchaError::invalid_parameter_with_context("as_int", "a boolean", "\"yes\"");
        assert_eq!(
            error.to_string(),
            "invalid parameter: option 'as_int' expected a boolean, but got \"yes\""
        );
    }

    #[test]
    fn test_image_error_converts_to_invalid_format() {
        let decode_failure = image::load_from_memory(b"definitely not an image");
        let error: CaptchaError = decode_failure.unwrap_err().into();
        assert_eq!(error.code(), code::INVALID_IMAGE_FORMAT);
    }
}
