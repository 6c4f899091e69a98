//! JPEG encoding of exported rasters.
//!
//! JPEG has no alpha channel, so transparent areas are composited over the
//! white background of the on-screen canvas before encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::render::{ExportedRaster, CHANNELS};

/// Background the raster is flattened onto.
const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Encode an exported raster to JPEG bytes.
///
/// # Arguments
///
/// * `raster` - The exported raster
/// * `quality` - JPEG quality (1-100, clamped; 90 is a good default)
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty raster,
/// `EncodeError::InvalidPixelData` if the buffer length is wrong, or
/// `EncodeError::EncodingFailed` if the encoder fails.
pub fn encode_jpeg(raster: &ExportedRaster, quality: u8) -> Result<Vec<u8>, EncodeError> {
    super::validate(raster)?;

    let rgb = flatten(&raster.pixels);
    let quality = quality.clamp(1, 100);

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, raster.side, raster.side, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out)
}

/// Composite straight-alpha RGBA over [`BACKGROUND`], producing RGB.
fn flatten(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for (c, bg) in px[..3].iter().zip(BACKGROUND) {
            let blended = (*c as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}
