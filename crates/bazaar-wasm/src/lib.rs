//! Bazaar WASM - WebAssembly bindings for listing photo reduction
//!
//! This crate exposes the bazaar-core reducer to the marketplace frontend,
//! letting the listing form shrink a photo before it is uploaded.
//!
//! # Module Structure
//!
//! - `reduce` - Reduction bindings and allow-list checks
//! - `types` - WASM-compatible wrapper for reduction reports
//!
//! # Usage
//!
//! ```typescript
//! import init, { reduce_image, is_supported_content_type } from '@bazaar/wasm';
//!
//! await init();
//!
//! if (is_supported_content_type(file.type)) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const reduced = reduce_image(bytes, file.type, 5 * 1024 * 1024);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod reduce;
mod types;

pub use reduce::{default_ceiling, is_supported_content_type, reduce_image, reduce_image_with_report};
pub use types::JsReduceReport;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
