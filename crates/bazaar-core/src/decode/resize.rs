//! Image resizing for the reducer's scale ladder.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// image's dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image
        .as_rgb_view()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer size mismatch".to_string()))?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize both dimensions by `tenths / 10`.
///
/// See [`scaled_dimensions`] for how the target size is derived.
pub fn scale_by_tenths(
    image: &DecodedImage,
    tenths: u8,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let (width, height) = scaled_dimensions(image.width, image.height, tenths);
    resize(image, width, height, filter)
}

/// Target dimensions for a scale of `tenths / 10`.
///
/// Each side is floored and clamped to at least one pixel. Integer math
/// keeps e.g. `0.7 * 100` from landing on 69.
pub fn scaled_dimensions(width: u32, height: u32, tenths: u8) -> (u32, u32) {
    let scale = |dim: u32| -> u32 {
        let scaled = u64::from(dim) * u64::from(tenths) / 10;
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };
    (scale(width), scale(height))
}
