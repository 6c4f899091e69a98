//! Underlay WASM - WebAssembly bindings for the underlay pipeline
//!
//! This crate exposes underlay-core to a JavaScript front end. The browser
//! owns the gesture recognizer, the photo picker and persistence; it forwards
//! gesture callbacks and picked bytes here and gets rasters and encoded
//! bytes back.
//!
//! # Module Structure
//!
//! - `session` - The editing session: gestures, modes, preview and export
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Picked photo decoding (JPEG, PNG, EXIF orientation)
//! - `encode` - PNG / JPEG encoding of exported rasters
//! - `transform` - Expanded-canvas rotation
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsUnderlaySession, decode_underlay, encode_png } from '@underlay/wasm';
//!
//! await init();
//!
//! const session = new JsUnderlaySession(window.innerHeight);
//! session.select_underlay(decode_underlay(new Uint8Array(await file.arrayBuffer())));
//! const png = encode_png(session.export());
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod session;
mod transform;
mod types;

pub use decode::{decode_underlay, get_orientation};
pub use encode::{encode_jpeg, encode_png};
pub use session::{JsMode, JsUnderlaySession};
pub use transform::{compute_rotated_bounds, rotate_image};
pub use types::{JsExportedRaster, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
