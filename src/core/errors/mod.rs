//! Error types for the recognition pipeline.
//!
//! This module provides the error handling system for the recognizer: a closed
//! taxonomy of failure kinds with stable numeric codes, structured detail
//! payloads, and helper constructors for creating well-formed errors with
//! appropriate context and error chaining.
//!
//! # Usage
//!
//! ```rust
//! use captcha_recognizer::core::errors::{CaptchaError, code};
//!
//! // Create a business error with structured details
//! let error = CaptchaError::unsupported_captcha_type(
//!     "slider",
//!     vec!["text".to_string(), "calculation".to_string()],
//! );
//! assert_eq!(error.code(), code::UNSUPPORTED_CAPTCHA_TYPE);
//!
//! // Reclassify an I/O failure into the taxonomy
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//! let error = CaptchaError::from_io(io, Some("challenge.png".as_ref()));
//! assert_eq!(error.code(), code::FILE_SYSTEM_ERROR);
//! ```

// Module declarations
pub mod constructors;
pub mod types;

// Re-export all public types for backward compatibility
pub use types::{CaptchaError, OpaqueError, code};

/// Convenient result alias for recognition operations.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

// Note: Constructor methods are implemented directly on CaptchaError in the
// constructors module, so they are automatically available when CaptchaError
// is imported.
