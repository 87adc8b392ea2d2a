//! WASM-compatible wrapper types for the editor bindings.
//!
//! This module provides JavaScript-friendly types that wrap the core Cropkit
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use cropkit_core::pipeline::OutputFormat;
use wasm_bindgen::prelude::*;

/// Image dimensions returned to JavaScript.
///
/// Returned by `load_image` and `set_image` so the host can size its canvas
/// before the first redraw.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct JsImageSize {
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsImageSize {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsImageSize {
        JsImageSize { width, height }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl JsImageSize {
    pub(crate) fn from_size(size: cropkit_core::geometry::Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Parse an output format name from JavaScript.
///
/// Recognized values are `"jpeg"` (or `"jpg"`) and `"png"`; anything else
/// falls back to JPEG, the export default.
pub(crate) fn format_from_str(value: &str) -> OutputFormat {
    match value {
        "png" => OutputFormat::Png,
        _ => OutputFormat::Jpeg,
    }
}
