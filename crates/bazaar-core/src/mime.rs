//! Content-type allow-list for listing photos.
//!
//! Uploads are accepted only when the declared content type is one of
//! [`ALLOWED_CONTENT_TYPES`]. The check runs before any byte of the upload
//! is inspected.

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Canonical MIME strings accepted for listing photos.
pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// An allowed image content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageMime {
    /// Parse a declared `Content-Type` header value.
    ///
    /// Matching ignores ASCII case, surrounding whitespace and any MIME
    /// parameters, so `"Image/PNG; charset=binary"` is accepted as PNG.
    /// Returns `None` for anything outside the allow-list.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpeg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            "image/webp" => Some(ImageMime::Webp),
            "image/gif" => Some(ImageMime::Gif),
            _ => None,
        }
    }

    /// Canonical MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
            ImageMime::Gif => "image/gif",
        }
    }

    /// File extension used when persisting an upload of this type.
    pub fn extension(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "jpg",
            ImageMime::Png => "png",
            ImageMime::Webp => "webp",
            ImageMime::Gif => "gif",
        }
    }

    /// The `image` crate format used as a decode hint.
    pub fn image_format(self) -> ImageFormat {
        match self {
            ImageMime::Jpeg => ImageFormat::Jpeg,
            ImageMime::Png => ImageFormat::Png,
            ImageMime::Webp => ImageFormat::WebP,
            ImageMime::Gif => ImageFormat::Gif,
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
