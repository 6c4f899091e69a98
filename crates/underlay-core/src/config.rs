//! Canvas configuration and export resolution tiers.
//!
//! The reference canvas is the square the underlay is fit into on screen. Its
//! side length is read once from the host display and then passed explicitly
//! to everything that needs it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The fixed on-screen reference canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Logical side length of the square canvas.
    pub canvas_length: f64,
}

impl CanvasConfig {
    /// Create a canvas configuration with the given side length.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCanvasLength` if the length is not finite
    /// or not positive.
    pub fn new(canvas_length: f64) -> Result<Self, ConfigError> {
        if !canvas_length.is_finite() || canvas_length <= 0.0 {
            return Err(ConfigError::InvalidCanvasLength(canvas_length));
        }
        Ok(Self { canvas_length })
    }

    /// Derive the canvas from display geometry.
    ///
    /// The canvas is a `height × height` square, so the width is only used
    /// for validation.
    pub fn from_display(width: f64, height: f64) -> Result<Self, ConfigError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ConfigError::InvalidCanvasLength(width));
        }
        Self::new(height)
    }

    /// Side length in whole pixels, as used for the on-screen preview.
    pub fn side_pixels(&self) -> u32 {
        self.canvas_length.round().max(1.0) as u32
    }
}

/// Export resolution tier, expressed as a multiple of the canvas length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportResolution {
    Low,
    #[default]
    Medium,
    High,
}

impl ExportResolution {
    /// Multiplier applied to the canvas length.
    pub fn multiplier(self) -> f64 {
        match self {
            ExportResolution::Low => 1.0,
            ExportResolution::Medium => 2.0,
            ExportResolution::High => 3.0,
        }
    }

    /// Output side length for this tier on the given canvas.
    pub fn side_length(self, canvas: &CanvasConfig) -> f64 {
        canvas.canvas_length * self.multiplier()
    }

    /// The next tier, wrapping from `High` back to `Low`.
    pub fn next(self) -> Self {
        match self {
            ExportResolution::Low => ExportResolution::Medium,
            ExportResolution::Medium => ExportResolution::High,
            ExportResolution::High => ExportResolution::Low,
        }
    }
}

impl fmt::Display for ExportResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportResolution::Low => "LOW",
            ExportResolution::Medium => "MED",
            ExportResolution::High => "HIGH",
        };
        f.write_str(label)
    }
}

impl From<u8> for ExportResolution {
    fn from(value: u8) -> Self {
        match value {
            0 => ExportResolution::Low,
            2 => ExportResolution::High,
            _ => ExportResolution::Medium,
        }
    }
}
