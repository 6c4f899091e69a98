//! PNG encoding of exported rasters.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::render::ExportedRaster;

/// Encode an exported raster to PNG bytes, alpha included.
///
/// Pixels outside the placed underlay stay fully transparent.
pub fn encode_png(raster: &ExportedRaster) -> Result<Vec<u8>, EncodeError> {
    super::validate(raster)?;

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&raster.pixels, raster.side, raster.side, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    tracing::debug!(side = raster.side, bytes = out.len(), "png encoded");
    Ok(out)
}
