//! The challenge-processor capability and its option map.

use crate::core::errors::{CaptchaError, CaptchaResult};
use serde_json::Value;

/// Per-call options passed through to the resolved processor.
///
/// The map is key-ordered (`serde_json::Map` is backed by a `BTreeMap`), which
/// makes its canonical serialization (and therefore the parameter digest the
/// cache is keyed on) independent of insertion order.
pub type ProcessorOptions = serde_json::Map<String, Value>;

/// A processor that interprets raw engine output for one challenge type.
///
/// Processors are registered in the
/// [`ProcessorRegistry`](crate::core::registry::ProcessorRegistry) under a
/// type tag and dispatched by the recognizer. Implementations own the call to
/// the OCR engine and the interpretation of its raw string output.
pub trait CaptchaProcessor: Send + Sync {
    /// Returns the processor's name, used in logs and error context.
    fn name(&self) -> &str;

    /// Recognizes a challenge from validated image bytes.
    ///
    /// # Arguments
    ///
    /// * `image` - Validated, encoded image bytes.
    /// * `options` - Per-call options; unknown keys are ignored.
    ///
    /// # Returns
    ///
    /// The recognized result string. An empty result is treated as a
    /// recognition failure by the dispatcher and never cached.
    fn process(&self, image: &[u8], options: &ProcessorOptions) -> CaptchaResult<String>;
}

/// Reads a boolean option, falling back to a default when absent.
///
/// A present value of the wrong type is an invalid parameter, not a silent
/// fallback.
pub fn bool_option(options: &ProcessorOptions, key: &str, default: bool) -> CaptchaResult<bool> {
    match options.get(key) {
        None => Ok(default),
        Some(Value::Bool(value)) => Ok(*value),
        Some(other) => Err(CaptchaError::invalid_parameter_with_context(
            key,
            "a boolean",
            &other.to_string(),
        )),
    }
}

/// Reads a string option, falling back to a default when absent.
pub fn str_option(options: &ProcessorOptions, key: &str, default: &str) -> CaptchaResult<String> {
    match options.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(CaptchaError::invalid_parameter_with_context(
            key,
            "a string",
            &other.to_string(),
        )),
    }
}
