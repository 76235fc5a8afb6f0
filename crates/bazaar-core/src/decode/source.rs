//! Upload decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation};
use crate::mime::ImageMime;

/// Decode uploaded image bytes.
///
/// The container format is sniffed from the magic bytes; when sniffing finds
/// nothing, the declared type `hint` is used instead. JPEG input has its EXIF
/// orientation applied, since re-encoding drops the tag.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for empty input and
/// `DecodeError::CorruptedFile` when the decoder rejects the data.
pub fn decode_image(bytes: &[u8], hint: ImageMime) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        reader.set_format(hint.image_format());
    }
    let format = reader.format();

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        });
    }

    let orientation = match format {
        Some(ImageFormat::Jpeg) => extract_orientation(bytes),
        _ => Orientation::Normal,
    };

    Ok(apply_orientation(img, orientation))
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the tag
/// cannot be read.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_decode_png() {
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(12, 8)), ImageFormat::Png);
        let img = decode_image(&png, ImageMime::Png).unwrap();
        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[test]
    fn test_decode_sniffs_format_over_declared_type() {
        // PNG bytes declared as JPEG still decode
        let png = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(5, 5)), ImageFormat::Png);
        let img = decode_image(&png, ImageMime::Jpeg).unwrap();
        assert_eq!(img.width(), 5);
    }

    #[test]
    fn test_decode_gif_and_webp() {
        let src = DynamicImage::ImageRgba8(half_transparent(6, 4));
        for (format, mime) in [
            (ImageFormat::Gif, ImageMime::Gif),
            (ImageFormat::WebP, ImageMime::Webp),
        ] {
            let bytes = encode_as(&src, format);
            let img = decode_image(&bytes, mime).unwrap();
            assert_eq!((img.width(), img.height()), (6, 4), "{format:?}");
        }
    }

    #[test]
    fn test_decode_corrupt_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03], ImageMime::Jpeg);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let jpeg = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(16, 16)), ImageFormat::Jpeg);
        let result = decode_image(&jpeg[..20], ImageMime::Jpeg);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_empty_bytes() {
        let result = decode_image(&[], ImageMime::Png);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_orientation_absent() {
        let jpeg = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(4, 2)), ImageFormat::Jpeg);
        assert_eq!(get_orientation(&jpeg), Orientation::Normal);
    }

    #[test]
    fn test_orientation_applied_to_jpeg() {
        let jpeg = encode_as(&DynamicImage::ImageRgb8(noisy_rgb(8, 4)), ImageFormat::Jpeg);
        let rotated = with_exif_orientation(&jpeg, 6);

        assert_eq!(get_orientation(&rotated), Orientation::Rotate90CW);

        let img = decode_image(&rotated, ImageMime::Jpeg).unwrap();
        assert_eq!((img.width(), img.height()), (4, 8));
    }
}
