//! The boundary trait for the external image-to-text classifier.

use crate::core::errors::CaptchaResult;

/// External image-to-text classifier consumed by challenge processors.
///
/// The engine is opaque to the core: model choice, internal resizing and
/// resampling behavior are implementation details of the collaborator.
/// Implementations classify their own failures into
/// [`CaptchaError`](crate::core::CaptchaError), typically
/// [`external_service`](crate::core::CaptchaError::external_service), so no
/// raw error type can escape the dispatcher. The call is synchronous; any
/// timeout enforcement belongs to the implementation, not the core.
pub trait OcrEngine: Send + Sync {
    /// Runs the classifier over raw image bytes and returns its raw text output.
    ///
    /// # Arguments
    ///
    /// * `image` - The encoded image bytes to classify.
    ///
    /// # Returns
    ///
    /// The unparsed text the classifier read from the image.
    fn classification(&self, image: &[u8]) -> CaptchaResult<String>;
}

/// Any compatible closure acts as an engine, which keeps test doubles and
/// simple adapters free of wrapper types.
impl<F> OcrEngine for F
where
    F: Fn(&[u8]) -> CaptchaResult<String> + Send + Sync,
{
    fn classification(&self, image: &[u8]) -> CaptchaResult<String> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_closure_acts_as_engine() {
        let engine: Arc<dyn OcrEngine> =
            Arc::new(|image: &[u8]| -> CaptchaResult<String> { Ok(format!("{}b", image.len())) });

        assert_eq!(engine.classification(&[1, 2, 3]).unwrap(), "3b");
    }
}
