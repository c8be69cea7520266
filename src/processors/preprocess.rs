//! Optional image pre-processing applied before recognition.
//!
//! Challenge images are often noisy on purpose. This module provides an
//! enhancement chain (grayscale, contrast, sharpening, denoising,
//! thresholding) that produces a cleaned-up PNG payload to feed into
//! [`recognize`](crate::pipeline::CaptchaRecognizer::recognize) as an
//! ordinary byte source. The core never invokes it implicitly.

use crate::core::errors::{CaptchaError, CaptchaResult};
use image::{DynamicImage, ImageFormat};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::{median_filter, sharpen3x3};
use std::io::Cursor;

/// Denoising filter selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DenoiseFilter {
    /// Median filter with the given radius; removes salt-and-pepper noise.
    Median { radius: u32 },
    /// Gaussian blur with the given sigma; softens uniform noise.
    Gaussian { sigma: f32 },
}

/// Configuration for the pre-processing chain.
///
/// Steps run in declaration order; each is skipped when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessConfig {
    /// Convert to grayscale first.
    pub grayscale: bool,
    /// Contrast enhancement factor; `1.0` leaves the image unchanged.
    pub contrast: Option<f32>,
    /// Apply a 3x3 sharpening kernel.
    pub sharpen: bool,
    /// Denoising filter.
    pub denoise: Option<DenoiseFilter>,
    /// Binarization threshold (0-255); pixels above become white.
    pub threshold: Option<u8>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            contrast: Some(2.0),
            sharpen: true,
            denoise: Some(DenoiseFilter::Median { radius: 1 }),
            threshold: None,
        }
    }
}

/// Runs the configured enhancement chain over an encoded image.
///
/// # Arguments
///
/// * `bytes` - Encoded image bytes in any format the `image` crate decodes.
/// * `config` - The steps to apply.
///
/// # Returns
///
/// The processed image re-encoded as PNG bytes.
pub fn preprocess_image(bytes: &[u8], config: &PreprocessConfig) -> CaptchaResult<Vec<u8>> {
    let mut img = image::load_from_memory(bytes)?;

    if config.grayscale {
        img = DynamicImage::ImageLuma8(img.to_luma8());
    }

    if let Some(factor) = config.contrast {
        // The image crate adjusts contrast by percentage points
        img = img.adjust_contrast((factor - 1.0) * 100.0);
    }

    if config.sharpen {
        img = DynamicImage::ImageLuma8(sharpen3x3(&img.to_luma8()));
    }

    if let Some(filter) = config.denoise {
        img = match filter {
            DenoiseFilter::Median { radius } => {
                DynamicImage::ImageLuma8(median_filter(&img.to_luma8(), radius, radius))
            }
            DenoiseFilter::Gaussian { sigma } => img.blur(sigma),
        };
    }

    if let Some(cutoff) = config.threshold {
        img = DynamicImage::ImageLuma8(threshold(&img.to_luma8(), cutoff, ThresholdType::Binary));
    }

    encode_png(&img)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> CaptchaResult<Vec<u8>> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| CaptchaError::invalid_image_data(format!("PNG encoding failed: {e}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient_png() -> Vec<u8> {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        });
        encode_png(&DynamicImage::ImageRgb8(img)).unwrap()
    }

    #[test]
    fn test_default_chain_produces_grayscale_png() {
        let processed = preprocess_image(&gradient_png(), &PreprocessConfig::default()).unwrap();

        let decoded = image::load_from_memory(&processed).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
    }

    #[test]
    fn test_threshold_binarizes() {
        let config = PreprocessConfig {
            grayscale: true,
            contrast: None,
            sharpen: false,
            denoise: None,
            threshold: Some(128),
        };
        let processed = preprocess_image(&gradient_png(), &config).unwrap();

        let decoded = image::load_from_memory(&processed).unwrap().to_luma8();
        assert!(decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_gaussian_denoise_keeps_dimensions() {
        let config = PreprocessConfig {
            grayscale: false,
            contrast: None,
            sharpen: false,
            denoise: Some(DenoiseFilter::Gaussian { sigma: 1.0 }),
            threshold: None,
        };
        let processed = preprocess_image(&gradient_png(), &config).unwrap();

        let decoded = image::load_from_memory(&processed).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let error = preprocess_image(b"not an image", &PreprocessConfig::default()).unwrap_err();
        assert_eq!(
            error.code(),
            crate::core::errors::code::INVALID_IMAGE_FORMAT
        );
    }
}
