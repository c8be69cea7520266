//! Challenge processors and image pre-processing.
//!
//! This module provides the baseline processor variants dispatched through
//! the registry: [`TextProcessor`] for plain-text challenges and
//! [`CalculationProcessor`] for arithmetic ones. It also hosts the optional image
//! pre-processing collaborator applied before recognition.

pub mod calculation;
pub mod preprocess;
pub mod text;

pub use calculation::CalculationProcessor;
pub use preprocess::{DenoiseFilter, PreprocessConfig, preprocess_image};
pub use text::TextProcessor;
