//! Decoding and canonicalization of uploaded listing photos.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, WebP and GIF uploads (with EXIF orientation for JPEG)
//! - Flattening transparent or paletted images onto an opaque background
//! - Resizing the canonical image for the reducer's scale ladder
//!
//! Everything here is synchronous and owns its buffers, so calls from
//! different request handlers never share state.

mod canonical;
mod resize;
mod source;
mod types;

pub use canonical::{canonicalize, WHITE};
pub use resize::{resize, scale_by_tenths, scaled_dimensions};
pub use source::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};

#[cfg(test)]
pub(crate) use source::fixtures;
