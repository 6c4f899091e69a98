//! Underlay session WASM bindings.
//!
//! The gesture recognizer lives in the browser. It forwards rotate, pinch and
//! pan callbacks here, and reads back the display transform to draw the
//! underlay beneath the canvas.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsUnderlaySession(window.innerHeight);
//! session.select_underlay(decode_underlay(bytes));
//!
//! // Gesture callbacks
//! session.scale_changed(event.scale);
//! session.scale_ended();
//!
//! // Draw the underlay
//! const [a, b, c, d, e, f] = session.display_matrix();
//! ctx.setTransform(a, b, c, d, e, f);
//!
//! // Save at the selected tier
//! const png = encode_png(session.export());
//! ```

use kurbo::Vec2;
use underlay_core::{
    CanvasConfig, ExportError, ExportResolution, ExportedRaster, InterpolationFilter, Mode,
    UnderlaySession,
};
use wasm_bindgen::prelude::*;

use crate::types::{resolution_to_u8, JsExportedRaster, JsSourceImage};

/// What the session is showing, mirrored for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsMode {
    Underlay = 0,
    Preview = 1,
    UnderlayPicker = 2,
}

impl From<Mode> for JsMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Underlay => JsMode::Underlay,
            Mode::Preview => JsMode::Preview,
            Mode::UnderlayPicker => JsMode::UnderlayPicker,
        }
    }
}

/// One underlay editing session.
#[wasm_bindgen]
pub struct JsUnderlaySession {
    inner: UnderlaySession,
}

#[wasm_bindgen]
impl JsUnderlaySession {
    /// Create a session for a square canvas of `canvas_length` logical pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_length: f64) -> Result<JsUnderlaySession, JsValue> {
        let canvas =
            CanvasConfig::new(canvas_length).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_canvas(canvas))
    }

    /// Create a session whose canvas is derived from the display size.
    pub fn from_display(width: f64, height: f64) -> Result<JsUnderlaySession, JsValue> {
        let canvas = CanvasConfig::from_display(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_canvas(canvas))
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_length(&self) -> f64 {
        self.inner.canvas().canvas_length
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> JsMode {
        self.inner.mode().into()
    }

    #[wasm_bindgen(getter)]
    pub fn has_underlay(&self) -> bool {
        self.inner.underlay().is_some()
    }

    // ----- Export tier -----

    /// Selected tier: 0 = Low, 1 = Medium, 2 = High.
    #[wasm_bindgen(getter)]
    pub fn resolution(&self) -> u8 {
        resolution_to_u8(self.inner.resolution())
    }

    #[wasm_bindgen(setter)]
    pub fn set_resolution(&mut self, value: u8) {
        self.inner.set_resolution(ExportResolution::from(value));
    }

    /// Button label for the selected tier (`LOW`, `MED`, `HIGH`).
    pub fn resolution_label(&self) -> String {
        self.inner.resolution().to_string()
    }

    pub fn cycle_resolution(&mut self) -> u8 {
        resolution_to_u8(self.inner.cycle_resolution())
    }

    // ----- Underlay selection and mode -----

    /// Take ownership of `image` as the new underlay and reset the pose.
    pub fn select_underlay(&mut self, image: JsSourceImage) {
        self.inner.select_underlay(image.into_source());
    }

    pub fn open_picker(&mut self) {
        self.inner.open_picker();
    }

    pub fn close_picker(&mut self) {
        self.inner.close_picker();
    }

    pub fn toggle_preview(&mut self) -> JsMode {
        self.inner.toggle_preview().into()
    }

    // ----- Gesture callbacks -----

    /// Rotation delta since the gesture began, in radians.
    pub fn rotate_changed(&mut self, delta_radians: f64) {
        self.inner.rotate_changed(delta_radians);
    }

    pub fn rotate_ended(&mut self) {
        self.inner.rotate_ended();
    }

    /// Pinch ratio since the gesture began. Returns the incremental
    /// multiplier relative to the previous callback.
    pub fn scale_changed(&mut self, ratio: f64) -> f64 {
        self.inner.scale_changed(ratio)
    }

    pub fn scale_ended(&mut self) {
        self.inner.scale_ended();
    }

    /// Pan translation since the gesture began, in canvas units.
    pub fn drag_changed(&mut self, dx: f64, dy: f64) {
        self.inner.drag_changed(Vec2::new(dx, dy));
    }

    pub fn drag_ended(&mut self) {
        self.inner.drag_ended();
    }

    // ----- Transforms -----

    /// The effective pose as `{ rotation, scale, translation: { x, y } }`.
    pub fn pose(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.pose())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Rotation normalized to `[0, 2π)` for display.
    pub fn display_rotation(&self) -> f64 {
        self.inner.pose().display_rotation()
    }

    pub fn fit_scale(&self) -> Result<f64, JsValue> {
        self.inner
            .fit_scale()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The full on-screen transform, serialized.
    pub fn display_transform(&self) -> Result<JsValue, JsValue> {
        let transform = self
            .inner
            .display_transform()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&transform).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Source-to-canvas affine as `[a, b, c, d, e, f]`, the argument order of
    /// `CanvasRenderingContext2D.setTransform`.
    pub fn display_matrix(&self) -> Result<Vec<f64>, JsValue> {
        self.display_coeffs()
            .map(|coeffs| coeffs.to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // ----- Rendering -----

    /// Render the current view at `output_side` pixels.
    ///
    /// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
    pub fn render(&self, output_side: f64, filter: u8) -> Result<JsExportedRaster, JsValue> {
        self.inner
            .render(output_side, InterpolationFilter::from(filter))
            .map(JsExportedRaster::from_raster)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the canvas-sized preview and keep it in the session.
    pub fn make_preview(&mut self) -> Result<JsExportedRaster, JsValue> {
        self.inner
            .make_preview()
            .map(|raster| JsExportedRaster::from_raster(raster.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render at the selected tier. The caller persists the result.
    pub fn export(&self) -> Result<JsExportedRaster, JsValue> {
        self.export_raster()
            .map(JsExportedRaster::from_raster)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsUnderlaySession {
    fn with_canvas(canvas: CanvasConfig) -> Self {
        Self {
            inner: UnderlaySession::new(canvas),
        }
    }

    fn display_coeffs(&self) -> Result<[f64; 6], ExportError> {
        Ok(self.inner.display_transform()?.to_affine().as_coeffs())
    }

    /// Run the session export with a sink that keeps the raster.
    fn export_raster(&self) -> Result<ExportedRaster, ExportError> {
        let mut saved = None;
        let mut keep = |raster: ExportedRaster| -> Result<(), ExportError> {
            saved = Some(raster);
            Ok(())
        };
        self.inner.export(&mut keep)?;
        saved.ok_or_else(|| ExportError::Sink("export produced no raster".to_string()))
    }
}
