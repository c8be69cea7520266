//! Processor for plain-text challenges.

use crate::core::errors::CaptchaResult;
use crate::core::traits::{CaptchaProcessor, OcrEngine, ProcessorOptions, bool_option};
use std::sync::Arc;

/// Recognizes plain-text challenges by post-processing raw engine output.
///
/// Post-processing steps run in a fixed order: space stripping
/// (`remove_spaces`, default on), lowercasing (`to_lower`, default off),
/// uppercasing (`to_upper`, default off). Uppercasing runs last, so it
/// dominates when both casing flags are set.
pub struct TextProcessor {
    engine: Arc<dyn OcrEngine>,
}

impl TextProcessor {
    /// Creates a text processor backed by the given engine.
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl CaptchaProcessor for TextProcessor {
    fn name(&self) -> &str {
        "text"
    }

    fn process(&self, image: &[u8], options: &ProcessorOptions) -> CaptchaResult<String> {
        let remove_spaces = bool_option(options, "remove_spaces", true)?;
        let to_lower = bool_option(options, "to_lower", false)?;
        let to_upper = bool_option(options, "to_upper", false)?;

        let mut text = self.engine.classification(image)?;

        if remove_spaces {
            text = text.replace(' ', "");
        }
        if to_lower {
            text = text.to_lowercase();
        }
        if to_upper {
            text = text.to_uppercase();
        }

        Ok(text)
    }
}
