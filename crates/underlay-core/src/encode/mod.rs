//! Encoding of exported rasters for saving to the photo library.
//!
//! - [`encode_png`] keeps the transparent area around the underlay
//! - [`encode_jpeg`] flattens onto the white canvas background
//!
//! # Examples
//!
//! ```ignore
//! use underlay_core::encode::encode_png;
//!
//! let raster = session.render(2048.0, InterpolationFilter::Lanczos3)?;
//! let png = encode_png(&raster)?;
//! ```

mod jpeg;
mod png;

use thiserror::Error;

use crate::render::{ExportedRaster, CHANNELS};

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur while encoding an exported raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel buffer length doesn't match the raster side
    #[error("Invalid pixel data: expected {expected} bytes (side * side * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Raster side is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

fn validate(raster: &ExportedRaster) -> Result<(), EncodeError> {
    if raster.side == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.side,
            height: raster.side,
        });
    }
    let expected = (raster.side as usize)
        .checked_mul(raster.side as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .unwrap_or(usize::MAX);
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }
    Ok(())
}
