//! Export rendering.
//!
//! The renderer uses inverse mapping: for each output pixel center it
//! computes the source position through the inverse of the composed
//! transform and samples there. Output pixels whose center maps outside the
//! source stay fully transparent, so anything drawn past the output bounds
//! is simply never visited (clipping, no wrap or extension).
//!
//! All validation happens before the output buffer is allocated. The buffer
//! is owned by the call until it is handed to the returned
//! [`ExportedRaster`]; every early return drops it.

mod raster;
mod sample;

pub use raster::{ExportedRaster, SourceImage, CHANNELS};
pub use sample::{sample, InterpolationFilter};

use kurbo::{Affine, Point};

use crate::error::ExportError;
use crate::fit::validate_source_size;
use crate::transform::ExportTransform;

/// Round a requested output side length to whole pixels.
///
/// # Errors
///
/// Returns `ExportError::InvalidOutputSize` for non-finite or non-positive
/// lengths, or lengths that round to zero or overflow `u32`.
pub fn output_pixels(output_side: f64) -> Result<u32, ExportError> {
    if !output_side.is_finite() || output_side <= 0.0 {
        return Err(ExportError::InvalidOutputSize(output_side));
    }
    let side = output_side.round();
    if side < 1.0 || side > u32::MAX as f64 {
        return Err(ExportError::InvalidOutputSize(output_side));
    }
    Ok(side as u32)
}

/// Render `source` into a new square raster placed by `transform`.
///
/// The raster side is `transform.output_side` rounded to whole pixels.
///
/// # Errors
///
/// - `ExportError::InvalidSourceImage` if the source is empty or its pixel
///   buffer does not match its dimensions
/// - `ExportError::InvalidOutputSize` if the output side is invalid
/// - `ExportError::OutOfMemory` if the output buffer cannot be allocated
#[tracing::instrument(
    skip_all,
    fields(
        source_width = source.width,
        source_height = source.height,
        output_side = transform.output_side,
        filter = ?filter,
    )
)]
pub fn render(
    source: &SourceImage,
    transform: &ExportTransform,
    filter: InterpolationFilter,
) -> Result<ExportedRaster, ExportError> {
    if source.is_empty() {
        return Err(ExportError::InvalidSourceImage {
            width: source.width as f64,
            height: source.height as f64,
        });
    }
    validate_source_size(transform.source_size.width, transform.source_size.height)?;
    if transform.source_size != source.size() {
        return Err(ExportError::InvalidSourceImage {
            width: transform.source_size.width,
            height: transform.source_size.height,
        });
    }
    let side = output_pixels(transform.output_side)?;

    let pixels = render_pixels(source, transform.to_affine(), side, side, filter)?;
    tracing::debug!(side, bytes = pixels.len(), "export rendered");
    Ok(ExportedRaster::new(side, pixels))
}

/// Fill a `width × height` RGBA buffer by sampling `source` through the
/// inverse of `to_output`.
pub(crate) fn render_pixels(
    source: &SourceImage,
    to_output: Affine,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
) -> Result<Vec<u8>, ExportError> {
    let row_bytes = (width as usize)
        .checked_mul(CHANNELS)
        .ok_or(ExportError::OutOfMemory { bytes: usize::MAX })?;
    let bytes = row_bytes
        .checked_mul(height as usize)
        .ok_or(ExportError::OutOfMemory { bytes: usize::MAX })?;

    let mut pixels = allocate(bytes)?;
    let to_source = to_output.inverse();

    let fill_row = |(y, row): (usize, &mut [u8])| {
        let cy = y as f64 + 0.5;
        for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let p = to_source * Point::new(x as f64 + 0.5, cy);
            if let Some(px) = sample(source, p.x, p.y, filter) {
                out.copy_from_slice(&px);
            }
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pixels.par_chunks_mut(row_bytes).enumerate().for_each(fill_row);
    }
    #[cfg(not(feature = "parallel"))]
    {
        pixels.chunks_mut(row_bytes).enumerate().for_each(fill_row);
    }

    Ok(pixels)
}

/// Allocate a zeroed (transparent) buffer, reporting failure instead of
/// aborting.
fn allocate(bytes: usize) -> Result<Vec<u8>, ExportError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(bytes)
        .map_err(|_| ExportError::OutOfMemory { bytes })?;
    pixels.resize(bytes, 0);
    Ok(pixels)
}
