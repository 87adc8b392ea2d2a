//! WASM bindings for the interactive editor.
//!
//! This module exposes the cropkit-core [`ImageEditor`] to JavaScript as a
//! stateful [`JsImageEditor`] handle. The host forwards pointer events and
//! resize notifications, then reads back cursor hints, overlay scenes,
//! snapshots and encoded exports.

use cropkit_core::editor::{EditorMode, EditorOptions, ImageEditor, PointerEvent};
use cropkit_core::geometry::Size;
use cropkit_core::gesture::PointerKind;
use cropkit_core::layout::SurfacePosition;
use cropkit_core::pipeline::Raster;
use wasm_bindgen::prelude::*;

use crate::types::{format_from_str, JsImageSize};

/// A stateful editor instance bound to one image and one drawing surface.
///
/// # Usage
///
/// ```typescript
/// const editor = new JsImageEditor(3); // CROP | SCALE
/// editor.load_image(bytes);
/// editor.surface_resized(canvas.width, canvas.height, rect.left, rect.top);
///
/// canvas.onpointermove = (e) => {
///   const cursor = editor.pointer_move(e.clientX, e.clientY, e.pointerType === 'touch');
///   canvas.style.cursor = cursor ?? 'auto';
///   replay(editor.scene());
/// };
/// ```
#[wasm_bindgen]
pub struct JsImageEditor {
    inner: ImageEditor,
}

#[wasm_bindgen]
impl JsImageEditor {
    /// Create an editor.
    ///
    /// # Arguments
    ///
    /// * `mode` - Capability bits: 1 = crop, 2 = scale, 3 = both. Unknown
    ///   bits are ignored.
    /// * `lock_width` / `lock_height` - Optional output lock applied to the
    ///   first loaded image. Pass undefined for an unlocked editor.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: u8, lock_width: Option<u32>, lock_height: Option<u32>) -> JsImageEditor {
        let locked_output_size = lock_width
            .zip(lock_height)
            .map(|(width, height)| Size::new(width, height));
        JsImageEditor {
            inner: ImageEditor::new(EditorOptions {
                mode: EditorMode::from_bits(mode),
                locked_output_size,
            }),
        }
    }

    /// Decode and install an image from its encoded bytes (JPEG or PNG).
    ///
    /// Clears any existing region and output lock. On decode failure the
    /// editor reverts to the no-image state and an error is returned.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<JsImageSize, JsValue> {
        match self.inner.load_image(bytes) {
            Ok(size) => Ok(JsImageSize::from_size(size)),
            Err(error) => {
                web_sys::console::warn_1(&JsValue::from_str(&error.to_string()));
                Err(JsValue::from_str(&error.to_string()))
            }
        }
    }

    /// Install already-decoded RGBA pixels (4 bytes per pixel, row-major).
    pub fn set_image(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<JsImageSize, JsValue> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {} bytes, got {}",
                expected,
                pixels.len()
            )));
        }
        let size = self.inner.set_image(Raster::new(width, height, pixels));
        Ok(JsImageSize::from_size(size))
    }

    /// Notify the editor that the hosting surface was measured or re-measured.
    ///
    /// # Arguments
    ///
    /// * `container_width` / `container_height` - Available on-screen area
    /// * `offset_x` / `offset_y` - Surface position on screen, used to map
    ///   client pointer coordinates into the surface
    pub fn surface_resized(
        &mut self,
        container_width: u32,
        container_height: u32,
        offset_x: f64,
        offset_y: f64,
    ) {
        self.inner.surface_resized(
            Size::new(container_width, container_height),
            SurfacePosition::new(offset_x, offset_y),
        );
    }

    /// Forward a pointer-down event. Returns a CSS cursor name or undefined.
    pub fn pointer_down(&mut self, x: f64, y: f64, is_touch: bool) -> Option<String> {
        self.forward(PointerKind::Down, x, y, is_touch)
    }

    /// Forward a pointer-move event. Returns a CSS cursor name or undefined.
    pub fn pointer_move(&mut self, x: f64, y: f64, is_touch: bool) -> Option<String> {
        self.forward(PointerKind::Move, x, y, is_touch)
    }

    /// Forward a pointer-up event. Returns a CSS cursor name or undefined.
    pub fn pointer_up(&mut self, x: f64, y: f64, is_touch: bool) -> Option<String> {
        self.forward(PointerKind::Up, x, y, is_touch)
    }

    /// Set a fixed export size, or pass zeroes through `clear_output_lock`.
    ///
    /// Returns the re-fit crop region as `{x, y, width, height}`, or null
    /// when no region exists yet.
    pub fn set_output_lock(&mut self, width: u32, height: u32) -> Result<JsValue, JsValue> {
        let refit = self.inner.set_output_lock(Some(Size::new(width, height)));
        match refit {
            Some(region) => serde_wasm_bindgen::to_value(&region.to_cardinal())
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }

    /// Remove the output lock; the region keeps its current geometry.
    pub fn clear_output_lock(&mut self) {
        self.inner.set_output_lock(None);
    }

    /// Read-only snapshot of the current edition state.
    ///
    /// Returns `{region, ratio, output_lock, image_size, surface_size,
    /// version}`; `version` increments on every geometry change, so hosts
    /// can cheaply detect staleness.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The full overlay redraw as an array of draw commands.
    ///
    /// Each command is a tagged object (`{op: "clear"}`, `{op:
    /// "fill_circle", center, radius, ...}`) in image-pixel coordinates;
    /// the host replays them onto its scaled 2D context.
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.scene())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Export the current edition as a `data:` URL.
    ///
    /// # Arguments
    ///
    /// * `format` - `"jpeg"` or `"png"` (unknown values fall back to JPEG)
    /// * `quality` - JPEG quality 1-100; ignored for PNG. Pass undefined
    ///   for the default (90).
    ///
    /// Returns undefined when crop is active but no region has been drawn
    /// yet. Calling before an image is loaded is an error.
    pub fn apply(&self, format: &str, quality: Option<u8>) -> Result<Option<String>, JsValue> {
        self.inner
            .apply(format_from_str(format), quality)
            .map(|encoded| encoded.map(|image| image.to_data_url()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Export the current edition as raw encoded bytes.
    pub fn apply_bytes(&self, format: &str, quality: Option<u8>) -> Result<JsValue, JsValue> {
        let encoded = self
            .inner
            .apply(format_from_str(format), quality)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(match encoded {
            Some(image) => js_sys::Uint8Array::from(image.bytes.as_slice()).into(),
            None => JsValue::NULL,
        })
    }

    /// Clear the crop region and any in-flight gesture; the image stays.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Capability bits this editor was created with.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> u8 {
        self.inner.mode().bits()
    }

    fn forward(&mut self, kind: PointerKind, x: f64, y: f64, is_touch: bool) -> Option<String> {
        self.inner
            .pointer_event(PointerEvent {
                kind,
                surface_position: SurfacePosition::new(x, y),
                is_touch,
            })
            .map(|cursor| cursor.as_css().to_string())
    }
}

/// Tests for the editor bindings.
///
/// Note: methods returning `Result<T, JsValue>` only run on wasm32 targets.
/// The underlying behavior is covered by `cropkit_core::editor`; here we
/// exercise the thin native-safe surface.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_pointer_flow_builds_region() {
        let mut editor = JsImageEditor::new(3, None, None);
        editor
            .inner
            .set_image(Raster::new(200, 200, vec![128u8; 200 * 200 * 4]));
        editor.surface_resized(200, 200, 0.0, 0.0);

        editor.pointer_down(50.0, 50.0, false);
        editor.pointer_move(100.0, 100.0, false);
        editor.pointer_up(100.0, 100.0, false);

        let region = editor.inner.region().unwrap();
        assert_eq!(region.width(), 50);
        assert_eq!(region.height(), 50);
    }

    #[test]
    fn test_hover_returns_css_cursor() {
        let mut editor = JsImageEditor::new(3, None, None);
        editor
            .inner
            .set_image(Raster::new(200, 200, vec![128u8; 200 * 200 * 4]));
        editor.surface_resized(200, 200, 0.0, 0.0);

        editor.pointer_down(50.0, 50.0, false);
        editor.pointer_move(100.0, 100.0, false);
        editor.pointer_up(100.0, 100.0, false);

        let cursor = editor.pointer_move(75.0, 75.0, false);
        assert_eq!(cursor.as_deref(), Some("move"));
    }

    #[test]
    fn test_mode_getter_round_trips() {
        assert_eq!(JsImageEditor::new(1, None, None).mode(), 1);
        assert_eq!(JsImageEditor::new(3, None, None).mode(), 3);
        // Unknown bits are dropped
        assert_eq!(JsImageEditor::new(0xFF, None, None).mode(), 3);
    }
}
