//! Canonical encoding of product photos before they are sent to the model.

use crate::error::ImageProcessingError;
use crate::models::NormalizedImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::borrow::Cow;

/// Longest side, in pixels, of an image handed to the model.
pub const MAX_DIMENSION: u32 = 1024;

/// JPEG quality of the normalized output.
pub const JPEG_QUALITY: u8 = 85;

pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Converts images to bounded-size RGB JPEGs.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    max_dimension: u32,
    quality: u8,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            quality: JPEG_QUALITY,
        }
    }
}

impl ImageNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Convert to RGB, shrink so the longer side fits the bound, and encode
    /// as JPEG.
    pub fn normalize(&self, image: &DynamicImage) -> Result<NormalizedImage, ImageProcessingError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ImageProcessingError(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let rgb: Cow<'_, RgbImage> = match image {
            DynamicImage::ImageRgb8(buffer) => Cow::Borrowed(buffer),
            other => Cow::Owned(other.to_rgb8()),
        };

        let rgb = match bounded_dimensions(width, height, self.max_dimension) {
            Some((new_width, new_height)) => {
                tracing::debug!(
                    width,
                    height,
                    new_width,
                    new_height,
                    "Downscaling image"
                );
                Cow::Owned(imageops::resize(
                    &*rgb,
                    new_width,
                    new_height,
                    FilterType::Lanczos3,
                ))
            }
            None => rgb,
        };

        let mut data = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut data, self.quality))?;

        Ok(NormalizedImage {
            mime_type: OUTPUT_MIME_TYPE,
            data,
        })
    }
}

/// Target size when the longer side exceeds `max`, preserving aspect ratio.
///
/// The longer side becomes exactly `max`; the shorter side is truncated to
/// whole pixels and never drops below one.
pub fn bounded_dimensions(width: u32, height: u32, max: u32) -> Option<(u32, u32)> {
    let longer = width.max(height);
    if longer <= max {
        return None;
    }

    let shorter = width.min(height) as u64;
    let scaled = (shorter * max as u64 / longer as u64).max(1) as u32;

    if width >= height {
        Some((max, scaled))
    } else {
        Some((scaled, max))
    }
}
