//! Flattening decoded uploads into opaque RGB.
//!
//! JPEG has no alpha channel, so every image with transparency (RGBA, LA,
//! or a palette with a transparent index) is composited over a solid
//! background before lossy encoding. Opaque images are only converted.

use image::DynamicImage;

use super::DecodedImage;

/// Background used when flattening transparent uploads.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Convert a decoded image into the canonical opaque RGB8 form.
///
/// Pixels are alpha-composited over `background`; a fully transparent
/// pixel becomes exactly `background`, a fully opaque one keeps its color.
pub fn canonicalize(img: DynamicImage, background: [u8; 3]) -> DecodedImage {
    if !img.color().has_alpha() {
        return DecodedImage::from_rgb_image(img.into_rgb8());
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);

    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        pixels.push(composite(r, background[0], a));
        pixels.push(composite(g, background[1], a));
        pixels.push(composite(b, background[2], a));
    }

    DecodedImage::new(width, height, pixels)
}

#[inline]
fn composite(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    // Max value is 255 * 255 + 127, well inside u16
    ((u16::from(fg) * a + u16::from(bg) * (255 - a) + 127) / 255) as u8
}
