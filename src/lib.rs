//! # Captcha Recognizer
//!
//! A Rust library that turns image-encoded challenge codes into typed,
//! application-meaningful results by delegating pixel interpretation to an
//! external OCR engine and interpreting its raw string output per challenge
//! type.
//!
//! ## Features
//!
//! - Content-addressed result cache with TTL expiry and LRU eviction
//! - Pluggable processor registry keyed by challenge type
//! - Baseline processors for plain-text and arithmetic challenges
//! - Uniform error taxonomy with stable numeric codes
//! - Thread-safe dispatch: callers share one recognizer across threads
//!
//! ## Components
//!
//! - **OcrEngine**: boundary trait for the external image-to-text classifier
//! - **CaptchaRecognizer**: orchestrates validation, caching and dispatch
//! - **ResultCache**: bounded, time-expiring map from image content to results
//! - **ProcessorRegistry**: runtime registration of challenge processors
//!
//! ## Modules
//!
//! * [`core`] - Error taxonomy, configuration, caching, registry, and traits
//! * [`pipeline`] - The recognition dispatcher and its statistics
//! * [`processors`] - Challenge-type processors and image pre-processing
//! * [`utils`] - Image source handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use captcha_recognizer::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Any `Fn(&[u8]) -> CaptchaResult<String>` acts as the OCR engine.
//! let engine: Arc<dyn OcrEngine> =
//!     Arc::new(|_image: &[u8]| -> CaptchaResult<String> { Ok("3+5=?".to_string()) });
//!
//! let recognizer = CaptchaRecognizer::new(engine)?;
//!
//! let options = ProcessorOptions::new();
//! let result = recognizer.recognize(
//!     std::path::Path::new("challenge.png"),
//!     "calculation",
//!     &options,
//! )?;
//! assert_eq!(result, "8");
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use captcha_recognizer::prelude::*;
/// ```
pub mod prelude {
    // Dispatcher (essential)
    pub use crate::pipeline::{CaptchaRecognizer, RecognitionStats};

    // Error Handling (essential)
    pub use crate::core::{CaptchaError, CaptchaResult};

    // Seams and configuration
    pub use crate::core::config::RecognizerConfig;
    pub use crate::core::{CaptchaProcessor, OcrEngine, ProcessorOptions};

    // Image input
    pub use crate::utils::ImageSource;
}

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
