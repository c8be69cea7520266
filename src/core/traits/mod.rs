//! Trait definitions for the recognition pipeline.
//!
//! This module groups the two seams of the recognizer: `engine` for the
//! external OCR classifier boundary, and `processor` for the challenge-type
//! processors dispatched through the registry.

pub mod engine;
pub mod processor;

pub use engine::OcrEngine;
pub use processor::{CaptchaProcessor, ProcessorOptions, bool_option, str_option};
