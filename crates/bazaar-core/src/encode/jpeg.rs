//! JPEG encoding of reducer candidates.
//!
//! Uses the `image` crate's baseline JPEG encoder. Every candidate the
//! reducer produces, at any quality or scale, goes through [`encode_jpeg`].

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(#[from] image::ImageError),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// `quality` is clamped to 1-100; higher values mean larger output and
/// fewer artifacts.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Vec::with_capacity(expected_len / 8);
    JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
        pixels,
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(buffer)
}

/// Encode a canonical image to JPEG bytes.
pub fn encode_decoded(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&image.pixels, image.width, image.height, quality)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any valid buffer encodes to a well-formed JPEG.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 0u8..=255,
            fill in any::<u8>(),
        ) {
            let pixels = vec![fill; (width as usize) * (height as usize) * 3];
            let jpeg = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }

        /// Encoding is deterministic for identical input.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
        ) {
            let pixels: Vec<u8> = (0..(width * height * 3) as usize)
                .map(|i| ((i * 37) % 256) as u8)
                .collect();

            let a = encode_jpeg(&pixels, width, height, quality).unwrap();
            let b = encode_jpeg(&pixels, width, height, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Mismatched buffer lengths are always rejected.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in (1u32..=30, 1u32..=30),
            delta in prop_oneof![-10i32..=-1, 1i32..=10],
        ) {
            let expected = (width as usize) * (height as usize) * 3;
            let actual = if delta > 0 {
                expected + delta as usize
            } else {
                expected.saturating_sub(delta.unsigned_abs() as usize)
            };
            prop_assume!(actual != expected);

            let result = encode_jpeg(&vec![0u8; actual], width, height, 90);
            prop_assert!(
                matches!(result, Err(EncodeError::InvalidPixelData { .. })),
                "Mismatched pixel data should return InvalidPixelData error"
            );
        }
    }
}
