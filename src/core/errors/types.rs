//! Core error type definitions for the recognition pipeline.

use serde_json::{Value, json};
use std::path::PathBuf;
use thiserror::Error;

/// Stable numeric error codes, grouped by range.
///
/// The ranges mirror the wire-level contract of the service this library
/// backs: generic failures live in the 1000s, authentication in the 2000s
/// (reserved for outer layers, unused by the core), business failures in the
/// 3000s, and system failures in the 4000s. Codes are stable across releases;
/// new codes are appended, existing ones never renumbered.
pub mod code {
    /// Success marker used by response envelopes.
    pub const SUCCESS: u32 = 0;

    // Generic errors (1000-1999)
    pub const UNKNOWN_ERROR: u32 = 1000;
    pub const INVALID_PARAMETER: u32 = 1001;
    pub const MISSING_PARAMETER: u32 = 1002;
    pub const INVALID_REQUEST_FORMAT: u32 = 1003;
    pub const INTERNAL_ERROR: u32 = 1004;

    // Authentication errors (2000-2999), reserved for outer layers
    pub const UNAUTHORIZED: u32 = 2000;
    pub const INVALID_API_KEY: u32 = 2001;
    pub const RATE_LIMIT_EXCEEDED: u32 = 2002;
    pub const PERMISSION_DENIED: u32 = 2003;
    pub const TOKEN_EXPIRED: u32 = 2004;

    // Business errors (3000-3999)
    pub const UNSUPPORTED_CAPTCHA_TYPE: u32 = 3000;
    pub const INVALID_IMAGE_FORMAT: u32 = 3001;
    pub const IMAGE_TOO_LARGE: u32 = 3002;
    pub const IMAGE_TOO_SMALL: u32 = 3003;
    pub const RECOGNITION_FAILED: u32 = 3004;
    pub const PROCESSING_TIMEOUT: u32 = 3005;
    pub const INVALID_IMAGE_DATA: u32 = 3006;

    // System errors (4000-4999)
    pub const DATABASE_ERROR: u32 = 4000;
    pub const CACHE_ERROR: u32 = 4001;
    pub const NETWORK_ERROR: u32 = 4002;
    pub const FILE_SYSTEM_ERROR: u32 = 4003;
    pub const EXTERNAL_SERVICE_ERROR: u32 = 4004;
}

/// Boxed error type used for wrapped causes.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// A minimal error wrapper for cases where only a message is available.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OpaqueError(pub String);

/// The closed set of failure kinds a recognition request can surface.
///
/// Every variant maps to one stable numeric code (see [`code`]) via
/// [`CaptchaError::code`], carries a human-readable message via `Display`,
/// exposes a structured detail payload via [`CaptchaError::details`], and may
/// wrap the original cause. No other error type escapes the dispatcher.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The requested challenge type has no registered processor.
    #[error("unsupported captcha type: {requested}")]
    UnsupportedCaptchaType {
        /// The type the caller asked for.
        requested: String,
        /// The types currently registered, sorted.
        known_types: Vec<String>,
    },

    /// The image payload could not be decoded as a supported format.
    #[error("invalid image format: {message}")]
    InvalidImageFormat {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// The image payload exceeds the configured size limit.
    #[error("image of {size} bytes exceeds the {max_size} byte limit")]
    ImageTooLarge { size: usize, max_size: usize },

    /// The image payload is below the configured minimum size.
    #[error("image of {size} bytes is below the {min_size} byte minimum")]
    ImageTooSmall { size: usize, min_size: usize },

    /// The processor produced no usable result for the image.
    #[error("recognition failed: {message}")]
    RecognitionFailed { message: String },

    /// Recognition exceeded the configured time budget.
    #[error("processing timed out after {timeout_secs}s")]
    ProcessingTimeout { timeout_secs: f64 },

    /// The image payload is structurally unusable (e.g. empty).
    #[error("invalid image data: {message}")]
    InvalidImageData { message: String },

    /// A caller-supplied parameter has an invalid value or type.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A required parameter was not supplied.
    #[error("missing parameter: {name}")]
    MissingParameter { name: String },

    /// The result cache reported an internal anomaly.
    #[error("cache error: {message}")]
    CacheError { message: String },

    /// A filesystem or permission failure during image acquisition.
    #[error("file system error: {message}")]
    FileSystem {
        message: String,
        /// The path involved, when known.
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedCause>,
    },

    /// A network failure while fetching image data.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// An external collaborator (typically the OCR engine) failed.
    #[error("external service error in {service}: {message}")]
    ExternalService {
        service: String,
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// An invariant inside the recognizer was violated.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// An unexpected failure that fits no other kind.
    #[error("unknown error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl CaptchaError {
    /// Returns the stable numeric code for this error kind.
    pub fn code(&self) -> u32 {
        match self {
            CaptchaError::UnsupportedCaptchaType { .. } => code::UNSUPPORTED_CAPTCHA_TYPE,
            CaptchaError::InvalidImageFormat { .. } => code::INVALID_IMAGE_FORMAT,
            CaptchaError::ImageTooLarge { .. } => code::IMAGE_TOO_LARGE,
            CaptchaError::ImageTooSmall { .. } => code::IMAGE_TOO_SMALL,
            CaptchaError::RecognitionFailed { .. } => code::RECOGNITION_FAILED,
            CaptchaError::ProcessingTimeout { .. } => code::PROCESSING_TIMEOUT,
            CaptchaError::InvalidImageData { .. } => code::INVALID_IMAGE_DATA,
            CaptchaError::InvalidParameter { .. } => code::INVALID_PARAMETER,
            CaptchaError::MissingParameter { .. } => code::MISSING_PARAMETER,
            CaptchaError::CacheError { .. } => code::CACHE_ERROR,
            CaptchaError::FileSystem { .. } => code::FILE_SYSTEM_ERROR,
            CaptchaError::Network { .. } => code::NETWORK_ERROR,
            CaptchaError::ExternalService { .. } => code::EXTERNAL_SERVICE_ERROR,
            CaptchaError::Internal { .. } => code::INTERNAL_ERROR,
            CaptchaError::Unknown { .. } => code::UNKNOWN_ERROR,
        }
    }

    /// Returns the structured detail payload for this error.
    ///
    /// The payload is sufficient to reconstruct the failure context
    /// programmatically; `Value::Null` when a variant has no extra context
    /// beyond its message.
    pub fn details(&self) -> Value {
        match self {
            CaptchaError::UnsupportedCaptchaType {
                requested,
                known_types,
            } => json!({
                "requested_type": requested,
                "known_types": known_types,
            }),
            CaptchaError::ImageTooLarge { size, max_size } => json!({
                "actual_size": size,
                "max_size": max_size,
            }),
            CaptchaError::ImageTooSmall { size, min_size } => json!({
                "actual_size": size,
                "min_size": min_size,
            }),
            CaptchaError::ProcessingTimeout { timeout_secs } => json!({
                "timeout": timeout_secs,
            }),
            CaptchaError::FileSystem { path, .. } => match path {
                Some(path) => json!({ "path": path.display().to_string() }),
                None => Value::Null,
            },
            CaptchaError::ExternalService { service, .. } => json!({
                "service": service,
            }),
            CaptchaError::Unknown { message, source } => json!({
                "error": source
                    .as_ref()
                    .map(|cause| cause.to_string())
                    .unwrap_or_else(|| message.clone()),
            }),
            _ => Value::Null,
        }
    }

    /// Returns the wrapped cause, if any.
    pub fn cause(&self) -> Option<&BoxedCause> {
        match self {
            CaptchaError::InvalidImageFormat { source, .. }
            | CaptchaError::FileSystem { source, .. }
            | CaptchaError::Network { source, .. }
            | CaptchaError::ExternalService { source, .. }
            | CaptchaError::Unknown { source, .. } => source.as_ref(),
            _ => None,
        }
    }

    /// Serializes the error into a response-shaped JSON value.
    ///
    /// The shape is `{success, error_code, message}` plus `details` and
    /// `cause` when present, matching the envelope consumed by outer layers.
    pub fn to_value(&self) -> Value {
        let mut value = json!({
            "success": false,
            "error_code": self.code(),
            "message": self.to_string(),
        });
        let details = self.details();
        if !details.is_null() {
            value["details"] = details;
        }
        if let Some(cause) = self.cause() {
            value["cause"] = Value::String(cause.to_string());
        }
        value
    }
}
