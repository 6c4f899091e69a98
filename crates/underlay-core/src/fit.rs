//! Aspect-fit display scale.
//!
//! On screen the underlay is shown "fit" into the square reference canvas:
//! uniformly scaled so its longer side fills the canvas and the shorter side
//! fits inside it.

use crate::config::CanvasConfig;
use crate::error::ExportError;

/// Uniform scale that fits the longer side of a `width × height` image to
/// `canvas_length`.
///
/// # Errors
///
/// Returns `ExportError::InvalidSourceImage` if either dimension is not
/// finite and positive.
///
/// # Example
///
/// ```
/// use underlay_core::fit::compute_fit_scale;
///
/// assert_eq!(compute_fit_scale(400.0, 300.0, 800.0).unwrap(), 2.0);
/// ```
pub fn compute_fit_scale(width: f64, height: f64, canvas_length: f64) -> Result<f64, ExportError> {
    validate_source_size(width, height)?;
    Ok(canvas_length / width.max(height))
}

/// Reject empty or degenerate source dimensions.
pub(crate) fn validate_source_size(width: f64, height: f64) -> Result<(), ExportError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ExportError::InvalidSourceImage { width, height })
    }
}

/// Fit-scale calculator bound to a reference canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectFit {
    canvas_length: f64,
}

impl AspectFit {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas_length: canvas.canvas_length,
        }
    }

    pub fn canvas_length(&self) -> f64 {
        self.canvas_length
    }

    pub fn fit_scale(&self, width: f64, height: f64) -> Result<f64, ExportError> {
        compute_fit_scale(width, height, self.canvas_length)
    }
}
