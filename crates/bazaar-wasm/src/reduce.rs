//! Photo reduction WASM bindings.
//!
//! The listing form runs the same reducer as the server before uploading,
//! so large phone photos do not have to cross the network at full size.
//!
//! # Example
//!
//! ```typescript
//! import { reduce_image_with_report, default_ceiling } from '@bazaar/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const report = reduce_image_with_report(bytes, file.type, default_ceiling());
//! const blob = new Blob([report.bytes()], { type: report.content_type });
//! ```

use bazaar_core::{reduce, ImageMime, ReduceOptions, DEFAULT_CEILING};
use wasm_bindgen::prelude::*;

use crate::types::JsReduceReport;

/// Reduce an image to at most `ceiling` bytes.
///
/// Returns the input unchanged when it already fits, otherwise JPEG bytes.
///
/// # Errors
///
/// Returns an error string for unsupported content types, undecodable
/// data, or encoder failures.
#[wasm_bindgen]
pub fn reduce_image(bytes: &[u8], content_type: &str, ceiling: usize) -> Result<Vec<u8>, JsValue> {
    reduce::reduce(bytes, content_type, ceiling).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Reduce an image and return the bytes with a description of the search.
#[wasm_bindgen]
pub fn reduce_image_with_report(
    bytes: &[u8],
    content_type: &str,
    ceiling: usize,
) -> Result<JsReduceReport, JsValue> {
    let options = ReduceOptions::with_ceiling(ceiling);
    let report = reduce::reduce_with_report(bytes, content_type, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if !report.fits_ceiling() {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "photo is still {} bytes after reduction (ceiling {})",
            report.bytes.len(),
            ceiling
        )));
    }

    Ok(JsReduceReport::from_report(report))
}

/// Whether the server accepts uploads of this content type.
#[wasm_bindgen]
pub fn is_supported_content_type(content_type: &str) -> bool {
    ImageMime::from_content_type(content_type).is_some()
}

/// The upload ceiling the server enforces, in bytes.
#[wasm_bindgen]
pub fn default_ceiling() -> usize {
    DEFAULT_CEILING
}
