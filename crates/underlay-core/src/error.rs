//! Error types for configuration and export.

use thiserror::Error;

/// Errors that can occur while fitting, composing, or rendering an export.
///
/// All variants are detected before any output pixels are written, so a
/// failed export never yields a partial raster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// The source image has a non-positive (or non-finite) dimension.
    #[error("Invalid source image: width ({width}) and height ({height}) must be positive")]
    InvalidSourceImage { width: f64, height: f64 },

    /// The requested output side length is non-positive, non-finite, or
    /// rounds to zero pixels.
    #[error("Invalid output size: {0} (must be a positive pixel length)")]
    InvalidOutputSize(f64),

    /// The reference canvas length is non-positive or non-finite.
    #[error("Invalid canvas length: {0} (must be finite and positive)")]
    InvalidCanvasLength(f64),

    /// A fit or pose scale is non-positive or non-finite.
    #[error("Invalid scale: {0} (must be finite and positive)")]
    InvalidScale(f64),

    /// Export was requested before an underlay image was selected.
    #[error("No underlay image selected")]
    NoSourceImage,

    /// The output buffer could not be allocated.
    #[error("Out of memory allocating a {bytes} byte output buffer")]
    OutOfMemory { bytes: usize },

    /// The export sink refused the rendered raster.
    #[error("Export sink failed: {0}")]
    Sink(String),
}

impl ExportError {
    /// Returns true for the "nothing to export" case, which callers usually
    /// ignore rather than surface as a failure.
    pub fn is_no_op(&self) -> bool {
        matches!(self, ExportError::NoSourceImage)
    }
}

/// Errors from building a [`CanvasConfig`](crate::config::CanvasConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Canvas length must be finite and positive.
    #[error("Invalid canvas length: {0} (must be finite and positive)")]
    InvalidCanvasLength(f64),
}
