//! Image encoding WASM bindings.
//!
//! The exported raster is encoded here and handed back as bytes; writing to
//! the photo library happens on the JavaScript side.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_jpeg } from '@underlay/wasm';
//!
//! const raster = session.export();
//! const png = encode_png(raster);       // keeps transparency
//! const jpeg = encode_jpeg(raster, 90); // flattened onto white
//! await saveToLibrary(new Blob([png], { type: 'image/png' }));
//! ```

use crate::types::JsExportedRaster;
use underlay_core::encode;
use wasm_bindgen::prelude::*;

/// Encode a raster to PNG bytes, alpha included.
#[wasm_bindgen]
pub fn encode_png(raster: &JsExportedRaster) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(raster.inner()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a raster to JPEG bytes.
///
/// # Arguments
///
/// * `raster` - The exported raster
/// * `quality` - JPEG quality (1-100, recommended: 90)
///
/// Transparent areas become white, the colour of the drawing canvas.
#[wasm_bindgen]
pub fn encode_jpeg(raster: &JsExportedRaster, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(raster.inner(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}
