//! The recognition pipeline module.
//!
//! This module provides the dispatcher that combines image acquisition, the
//! result cache, and the processor registry into the caller-facing
//! [`recognize`](CaptchaRecognizer::recognize) operation, together with the
//! statistics it maintains.

pub mod recognizer;
pub mod stats;

pub use recognizer::CaptchaRecognizer;
pub use stats::{RecognitionStats, StatsManager};
