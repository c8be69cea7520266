//! Image source handling for the recognition pipeline.
//!
//! Callers hand the dispatcher a file path, raw encoded bytes, or an
//! already-decoded image. [`ImageSource`] resolves all three into one
//! validated byte payload, reclassifying acquisition failures into the
//! error taxonomy before they reach the core.

use crate::core::config::RecognitionConfig;
use crate::core::errors::{CaptchaError, CaptchaResult};
use crate::processors::preprocess::encode_png;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// A challenge image supplied by the caller.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A path to an encoded image file.
    Path(PathBuf),
    /// Raw encoded image bytes.
    Bytes(Vec<u8>),
    /// An already-decoded image; re-encoded as PNG before hashing.
    Image(DynamicImage),
}

impl ImageSource {
    /// Resolves the source into validated encoded bytes.
    ///
    /// Validation order: acquisition, emptiness, size window, decodability.
    /// Filesystem and permission failures are reclassified, not surfaced raw.
    ///
    /// # Arguments
    ///
    /// * `limits` - The size window and defaults to validate against.
    pub fn into_bytes(self, limits: &RecognitionConfig) -> CaptchaResult<Vec<u8>> {
        let (bytes, already_decoded) = match self {
            ImageSource::Path(path) => {
                let bytes = std::fs::read(&path)
                    .map_err(|e| CaptchaError::from_io(e, Some(path.as_path())))?;
                (bytes, false)
            }
            ImageSource::Bytes(bytes) => (bytes, false),
            ImageSource::Image(img) => (encode_png(&img)?, true),
        };

        if bytes.is_empty() {
            return Err(CaptchaError::invalid_image_data("image payload is empty"));
        }
        if bytes.len() > limits.max_image_size {
            return Err(CaptchaError::image_too_large(
                bytes.len(),
                limits.max_image_size,
            ));
        }
        if bytes.len() < limits.min_image_size {
            return Err(CaptchaError::image_too_small(
                bytes.len(),
                limits.min_image_size,
            ));
        }

        // Bytes we encoded ourselves are decodable by construction
        if !already_decoded {
            image::load_from_memory(&bytes)?;
        }

        Ok(bytes)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        ImageSource::Bytes(bytes.to_vec())
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Image(img)
    }
}
