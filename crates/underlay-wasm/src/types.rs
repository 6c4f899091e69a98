//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core `SourceImage` and `ExportedRaster` and handle the
//! conversion between Rust and JavaScript data representations. All pixel
//! buffers are RGBA, 4 bytes per pixel, row-major.

use underlay_core::render::{ExportedRaster, SourceImage, CHANNELS};
use underlay_core::ExportResolution;
use wasm_bindgen::prelude::*;

/// An underlay photo for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`. Passing the image to `JsUnderlaySession.select_underlay`
/// moves it into the session without copying; the JS handle is consumed.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Wrap RGBA pixels, e.g. from `ImageData.data`.
    ///
    /// # Errors
    /// Returns an error if `pixels.length != width * height * 4` or either
    /// dimension is zero.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        let expected = width as usize * height as usize * CHANNELS;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid image: {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            inner: SourceImage::new(width, height, pixels),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }

    pub(crate) fn into_source(self) -> SourceImage {
        self.inner
    }
}

/// A rendered square raster for JavaScript.
///
/// Areas not covered by the underlay are transparent (alpha 0).
#[wasm_bindgen]
pub struct JsExportedRaster {
    inner: ExportedRaster,
}

#[wasm_bindgen]
impl JsExportedRaster {
    /// Side length in pixels; the raster is `side × side`.
    #[wasm_bindgen(getter)]
    pub fn side(&self) -> u32 {
        self.inner.side
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as Uint8Array (copied), ready for
    /// `new ImageData(new Uint8ClampedArray(pixels), side, side)`.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Bounding box of the non-transparent pixels as `[x0, y0, x1, y1]`,
    /// empty when the raster is fully transparent.
    pub fn occupied_bounds(&self) -> Vec<u32> {
        self.inner
            .occupied_bounds()
            .map(|(x0, y0, x1, y1)| vec![x0, y0, x1, y1])
            .unwrap_or_default()
    }

    /// Use this raster as an underlay of its own, e.g. to keep drawing over
    /// an exported composition.
    pub fn into_source(self) -> JsSourceImage {
        JsSourceImage::from_source(self.inner.into_source())
    }
}

impl JsExportedRaster {
    pub(crate) fn from_raster(inner: ExportedRaster) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &ExportedRaster {
        &self.inner
    }
}

/// Convert an export tier to the `u8` the JS side uses (0 = Low, 1 = Medium,
/// 2 = High). The reverse is `ExportResolution::from(u8)`.
pub(crate) fn resolution_to_u8(resolution: ExportResolution) -> u8 {
    match resolution {
        ExportResolution::Low => 0,
        ExportResolution::Medium => 1,
        ExportResolution::High => 2,
    }
}
