//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_underlay } from '@underlay/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! session.select_underlay(decode_underlay(bytes));
//! ```

use crate::types::JsSourceImage;
use underlay_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a picked JPEG or PNG into an upright RGBA underlay.
///
/// EXIF orientation is applied, so the result matches what the photo
/// library shows.
///
/// # Errors
///
/// Returns an error if the bytes are empty, not JPEG/PNG, or corrupted.
#[wasm_bindgen]
pub fn decode_underlay(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_underlay(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// EXIF orientation tag (1-8) of encoded image bytes, 1 when absent.
#[wasm_bindgen]
pub fn get_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_empty_bytes() {
        assert!(decode_underlay(&[]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_underlay(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
