//! Rotation WASM bindings.

use crate::types::JsSourceImage;
use underlay_core::render::InterpolationFilter;
use underlay_core::transform;
use wasm_bindgen::prelude::*;

/// Rotate an image about its center onto a canvas large enough to hold it.
///
/// # Arguments
///
/// * `image` - The image to rotate
/// * `radians` - Clockwise rotation in radians
/// * `filter` - 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// Corners outside the rotated image are transparent.
#[wasm_bindgen]
pub fn rotate_image(
    image: &JsSourceImage,
    radians: f64,
    filter: u8,
) -> Result<JsSourceImage, JsValue> {
    transform::rotate_image(image.source(), radians, InterpolationFilter::from(filter))
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Size of the canvas `rotate_image` produces, as `[width, height]`.
#[wasm_bindgen]
pub fn compute_rotated_bounds(width: u32, height: u32, radians: f64) -> Vec<u32> {
    let (w, h) = transform::compute_rotated_bounds(width, height, radians);
    vec![w, h]
}
