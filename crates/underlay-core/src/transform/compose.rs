//! Export transform composition.
//!
//! The same composition drives the on-screen display and every export, so
//! what is rendered at any resolution is the on-screen view scaled by
//! `output_side / canvas_length`.
//!
//! # Composition Order
//!
//! Applied to an image whose origin is its own center, about the center of
//! the output canvas:
//!
//! 1. Translate by the pose translation, scaled into output pixels
//! 2. Rotate by the pose rotation
//! 3. Scale by `fit_scale * pose.scale * output_scale_factor`
//!
//! ```text
//! M = T(canvas_center) · T(translation · k) · R(rotation) · S(combined) · T(-source_center)
//! ```
//!
//! Swapping steps 1 and 2 moves the image whenever both translation and
//! rotation are non-zero, so this order is fixed.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::error::ExportError;
use crate::fit::validate_source_size;
use crate::pose::Pose;

/// Placement of the source image within an output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportTransform {
    /// Side length of the square output, in pixels.
    pub output_side: f64,
    /// `output_side / canvas_length`.
    pub output_scale_factor: f64,
    /// Display fit, user scale, and resolution scale combined.
    pub combined_scale: f64,
    /// Source size in source pixels.
    pub source_size: Size,
    /// Size the source occupies in output pixels, before rotation.
    pub rendered_size: Size,
    /// Pose translation in output pixels.
    pub translation: Vec2,
    /// Pose rotation in radians.
    pub rotation: f64,
}

impl ExportTransform {
    /// Center of the output canvas.
    pub fn center(&self) -> Point {
        Point::new(self.output_side / 2.0, self.output_side / 2.0)
    }

    /// Maps image-centered coordinates into output pixel coordinates.
    pub fn placement(&self) -> Affine {
        Affine::translate(self.center().to_vec2())
            * Affine::translate(self.translation)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.combined_scale)
    }

    /// Maps source pixel coordinates (origin top-left) into output pixel
    /// coordinates.
    pub fn to_affine(&self) -> Affine {
        let source_center = Vec2::new(self.source_size.width, self.source_size.height) / 2.0;
        self.placement() * Affine::translate(-source_center)
    }

    /// Where the source corners land in the output, clockwise from the
    /// top-left source corner.
    pub fn output_corners(&self) -> [Point; 4] {
        let affine = self.to_affine();
        let Size { width, height } = self.source_size;
        [
            affine * Point::new(0.0, 0.0),
            affine * Point::new(width, 0.0),
            affine * Point::new(width, height),
            affine * Point::new(0.0, height),
        ]
    }
}

/// Compose the transform that renders `pose` into an `output_side` square.
///
/// # Errors
///
/// - `ExportError::InvalidSourceImage` for non-positive source dimensions
/// - `ExportError::InvalidCanvasLength` for a non-positive or non-finite
///   canvas
/// - `ExportError::InvalidScale` for a non-positive or non-finite fit or
///   pose scale
/// - `ExportError::InvalidOutputSize` for a non-positive or non-finite
///   output side
pub fn compose_export_transform(
    pose: &Pose,
    fit_scale: f64,
    canvas_length: f64,
    output_side: f64,
    source_width: f64,
    source_height: f64,
) -> Result<ExportTransform, ExportError> {
    validate_source_size(source_width, source_height)?;
    if !is_positive(canvas_length) {
        return Err(ExportError::InvalidCanvasLength(canvas_length));
    }
    for scale in [fit_scale, pose.scale] {
        if !is_positive(scale) {
            return Err(ExportError::InvalidScale(scale));
        }
    }
    if !is_positive(output_side) {
        return Err(ExportError::InvalidOutputSize(output_side));
    }

    let output_scale_factor = output_side / canvas_length;
    let combined_scale = fit_scale * pose.scale * output_scale_factor;

    Ok(ExportTransform {
        output_side,
        output_scale_factor,
        combined_scale,
        source_size: Size::new(source_width, source_height),
        rendered_size: Size::new(source_width * combined_scale, source_height * combined_scale),
        translation: pose.translation * output_scale_factor,
        rotation: pose.rotation,
    })
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Transform composer bound to a reference canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComposer {
    canvas_length: f64,
}

impl TransformComposer {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas_length: canvas.canvas_length,
        }
    }

    /// Transform for an export of `output_side` pixels.
    pub fn compose(
        &self,
        pose: &Pose,
        fit_scale: f64,
        output_side: f64,
        source_size: Size,
    ) -> Result<ExportTransform, ExportError> {
        compose_export_transform(
            pose,
            fit_scale,
            self.canvas_length,
            output_side,
            source_size.width,
            source_size.height,
        )
    }

    /// Transform for the on-screen canvas itself.
    pub fn compose_display(
        &self,
        pose: &Pose,
        fit_scale: f64,
        source_size: Size,
    ) -> Result<ExportTransform, ExportError> {
        self.compose(pose, fit_scale, self.canvas_length, source_size)
    }
}
