//! Expanded-canvas rotation.
//!
//! Rotates an image about its center into a new image just large enough to
//! hold every rotated corner, using the same sampler as the export renderer.
//!
//! Angles are in radians. Positive angles rotate clockwise on screen, the
//! same direction as [`Pose::rotation`](crate::pose::Pose).

use std::f64::consts::FRAC_PI_2;

use kurbo::{Affine, Vec2};

use crate::error::ExportError;
use crate::render::{render_pixels, InterpolationFilter, SourceImage};

/// Tolerance for treating an angle as a multiple of a quarter turn.
const QUARTER_TURN_EPSILON: f64 = 1e-9;

/// Compute the bounding box of a `width × height` image rotated by
/// `radians`.
///
/// Sizes are floored to whole pixels, trimming the tiny overshoot that
/// floating point leaves on exact fits. Quarter turns swap or keep the
/// dimensions exactly. The result is never smaller than 1×1.
///
/// # Example
///
/// ```
/// use std::f64::consts::FRAC_PI_2;
/// use underlay_core::transform::compute_rotated_bounds;
///
/// assert_eq!(compute_rotated_bounds(100, 50, FRAC_PI_2), (50, 100));
/// assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, radians: f64) -> (u32, u32) {
    let quarters = radians / FRAC_PI_2;
    let nearest = quarters.round();
    if (quarters - nearest).abs() < QUARTER_TURN_EPSILON {
        // rem_euclid keeps negative quarter turns in 0..4
        return if (nearest as i64).rem_euclid(2) == 1 {
            (height.max(1), width.max(1))
        } else {
            (width.max(1), height.max(1))
        };
    }

    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    let (w, h) = (width as f64, height as f64);

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin + QUARTER_TURN_EPSILON).floor() as u32;
    let new_h = (w * sin + h * cos + QUARTER_TURN_EPSILON).floor() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image about its center onto an expanded canvas.
///
/// Corners of the new canvas not covered by the rotated image are
/// transparent.
///
/// # Errors
///
/// - `ExportError::InvalidSourceImage` if the image is empty
/// - `ExportError::OutOfMemory` if the output cannot be allocated
pub fn rotate_image(
    image: &SourceImage,
    radians: f64,
    filter: InterpolationFilter,
) -> Result<SourceImage, ExportError> {
    if image.is_empty() {
        return Err(ExportError::InvalidSourceImage {
            width: image.width as f64,
            height: image.height as f64,
        });
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, radians);

    // Move origin to the middle, rotate, then draw the source centered on it
    let to_output = Affine::translate(Vec2::new(dst_w as f64, dst_h as f64) / 2.0)
        * Affine::rotate(radians)
        * Affine::translate(-Vec2::new(image.width as f64, image.height as f64) / 2.0);

    let pixels = render_pixels(image, to_output, dst_w, dst_h, filter)?;
    Ok(SourceImage::new(dst_w, dst_h, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, PI, TAU};

    /// Create a simple test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    #[test]
    fn test_quarter_turn_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, FRAC_PI_2), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, PI), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 3.0 * FRAC_PI_2), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -FRAC_PI_2), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 2.0 * TAU + FRAC_PI_2), (50, 100));
    }

    #[test]
    fn test_45_degree_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, FRAC_PI_4);
        // Diagonal of 100x100 square is ~141.4, floored
        assert_eq!((w, h), (141, 141));
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 0.5),
            compute_rotated_bounds(100, 80, -0.5)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [0.1, 0.5, 1.0, FRAC_PI_2, 2.0, PI, 4.0] {
            let (w, h) = compute_rotated_bounds(1, 1, angle);
            assert!(w > 0 && h > 0, "zero bounds for angle {}", angle);
        }
        assert_eq!(compute_rotated_bounds(0, 0, 0.0), (1, 1));
    }

    #[test]
    fn test_no_rotation_copies_pixels() {
        let img = test_image(20, 10);
        let result = rotate_image(&img, 0.0, InterpolationFilter::Nearest).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_quarter_turn_moves_corner() {
        let img = test_image(20, 10);
        let result = rotate_image(&img, FRAC_PI_2, InterpolationFilter::Nearest).unwrap();

        assert_eq!((result.width, result.height), (10, 20));
        // Clockwise: the source top-left lands at the output top-right
        assert_eq!(result.pixel(9, 0), img.pixel(0, 0));
        // and the source bottom-left at the output top-left
        assert_eq!(result.pixel(0, 0), img.pixel(0, 9));
    }

    #[test]
    fn test_diagonal_rotation_leaves_transparent_corners() {
        let img = test_image(50, 50);
        let result = rotate_image(&img, FRAC_PI_4, InterpolationFilter::Bilinear).unwrap();

        assert!(result.width > img.width);
        assert_eq!(result.pixel(0, 0)[3], 0);
        let (cx, cy) = (result.width as usize / 2, result.height as usize / 2);
        assert_eq!(result.pixel(cx, cy)[3], 255);
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = SourceImage::new(0, 0, vec![]);
        assert!(rotate_image(&img, 1.0, InterpolationFilter::Bilinear).is_err());
    }

    #[test]
    fn test_1x1_image_rotation() {
        let img = SourceImage::filled(1, 1, [128, 128, 128, 255]);
        let result = rotate_image(&img, 0.7, InterpolationFilter::Lanczos3).unwrap();
        assert!(result.width >= 1);
        assert!(result.height >= 1);
    }
}
