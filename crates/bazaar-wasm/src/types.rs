//! WASM-compatible wrapper types for reducer results.

use bazaar_core::ReduceReport;
use wasm_bindgen::prelude::*;

/// Result of an in-browser reduction.
///
/// The encoded bytes stay in WASM memory until `bytes()` copies them out,
/// so inspecting `fits_ceiling` or `outcome` first is cheap.
#[wasm_bindgen]
pub struct JsReduceReport {
    inner: ReduceReport,
}

#[wasm_bindgen]
impl JsReduceReport {
    /// Encoded bytes as a fresh `Uint8Array`.
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.inner.bytes.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// MIME type of `bytes()`, suitable for a `Blob`.
    #[wasm_bindgen(getter)]
    pub fn content_type(&self) -> String {
        self.inner.content_type.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn fits_ceiling(&self) -> bool {
        self.inner.fits_ceiling()
    }

    /// Outcome as `{ kind: "quality", quality: 85 }` and similar.
    pub fn outcome(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.outcome)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Array of `{ quality, scale_tenths, width, height, len }`.
    pub fn attempts(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.attempts)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsReduceReport {
    pub(crate) fn from_report(inner: ReduceReport) -> Self {
        Self { inner }
    }

    #[cfg(test)]
    pub(crate) fn report(&self) -> &ReduceReport {
        &self.inner
    }
}
