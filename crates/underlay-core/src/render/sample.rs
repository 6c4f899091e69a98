//! Source sampling with nearest, bilinear, and Lanczos3 interpolation.
//!
//! Sample positions are continuous source coordinates where pixel `(i, j)`
//! covers `[i, i+1) × [j, j+1)`. Positions outside the source area return
//! `None` so the caller leaves the output pixel transparent. Inside the area,
//! neighbours that fall off the edge are clamped to the nearest edge pixel,
//! which keeps the image border crisp instead of fading to black.

use serde::{Deserialize, Serialize};

use super::raster::SourceImage;

/// Interpolation filter used when sampling the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Nearest neighbour - fastest, blocky when upscaling.
    Nearest,
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

impl From<u8> for InterpolationFilter {
    fn from(value: u8) -> Self {
        match value {
            0 => InterpolationFilter::Nearest,
            2 => InterpolationFilter::Lanczos3,
            _ => InterpolationFilter::Bilinear,
        }
    }
}

/// Sample the source at a continuous position. `None` outside the image or
/// when its buffer does not match its dimensions.
#[inline]
pub fn sample(image: &SourceImage, x: f64, y: f64, filter: InterpolationFilter) -> Option<[u8; 4]> {
    if image.is_empty() {
        return None;
    }
    let (w, h) = (image.width as f64, image.height as f64);
    // Written so NaN positions fall outside
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return None;
    }

    Some(match filter {
        InterpolationFilter::Nearest => image.pixel(x as usize, y as usize),
        InterpolationFilter::Bilinear => sample_bilinear(image, x - 0.5, y - 0.5),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x - 0.5, y - 0.5),
    })
}

/// Get a pixel as [f64; 4], clamping the coordinates to the image.
#[inline]
fn clamped_pixel_f64(image: &SourceImage, px: i64, py: i64) -> [f64; 4] {
    let px = px.clamp(0, image.width as i64 - 1) as usize;
    let py = py.clamp(0, image.height as i64 - 1) as usize;
    image.pixel(px, py).map(f64::from)
}

/// Bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = clamped_pixel_f64(image, x0, y0);
    let p10 = clamped_pixel_f64(image, x0 + 1, y0);
    let p01 = clamped_pixel_f64(image, x0, y0 + 1);
    let p11 = clamped_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 interpolation over a 6x6 neighbourhood.
fn sample_lanczos3(image: &SourceImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(y - py as f64, 3.0);
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(x - px as f64, 3.0) * wy;

            let pixel = clamped_pixel_f64(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 4];
    if weight_sum.abs() > f64::EPSILON {
        for i in 0..4 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal gradient, opaque.
    fn gradient(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                let v = (x * 10) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    #[test]
    fn test_outside_returns_none() {
        let img = gradient(4, 4);
        for filter in [
            InterpolationFilter::Nearest,
            InterpolationFilter::Bilinear,
            InterpolationFilter::Lanczos3,
        ] {
            assert!(sample(&img, -0.01, 1.0, filter).is_none());
            assert!(sample(&img, 4.0, 1.0, filter).is_none());
            assert!(sample(&img, 1.0, 4.0, filter).is_none());
            assert!(sample(&img, f64::NAN, 1.0, filter).is_none());
        }
    }

    #[test]
    fn test_mismatched_buffer_samples_nothing() {
        let img = SourceImage::new(4, 4, vec![255; 10]);
        for filter in [
            InterpolationFilter::Nearest,
            InterpolationFilter::Bilinear,
            InterpolationFilter::Lanczos3,
        ] {
            assert!(sample(&img, 3.5, 3.5, filter).is_none());
        }
    }

    #[test]
    fn test_pixel_centers_are_exact() {
        let img = gradient(8, 8);
        for filter in [
            InterpolationFilter::Nearest,
            InterpolationFilter::Bilinear,
            InterpolationFilter::Lanczos3,
        ] {
            assert_eq!(sample(&img, 3.5, 2.5, filter), Some([30, 30, 30, 255]));
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = gradient(4, 1);
        // Halfway between the centers of pixels 1 and 2
        assert_eq!(
            sample(&img, 2.0, 0.5, InterpolationFilter::Bilinear),
            Some([15, 15, 15, 255])
        );
    }

    #[test]
    fn test_edges_are_clamped() {
        let img = gradient(4, 4);
        // Left edge of the first pixel: only pixel 0 contributes
        assert_eq!(
            sample(&img, 0.0, 0.0, InterpolationFilter::Bilinear),
            Some([0, 0, 0, 255])
        );
        // Alpha stays opaque right up to the border
        let px = sample(&img, 3.99, 3.99, InterpolationFilter::Lanczos3).unwrap();
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(InterpolationFilter::from(0), InterpolationFilter::Nearest);
        assert_eq!(InterpolationFilter::from(1), InterpolationFilter::Bilinear);
        assert_eq!(InterpolationFilter::from(2), InterpolationFilter::Lanczos3);
        // Unknown values default to Bilinear
        assert_eq!(InterpolationFilter::from(255), InterpolationFilter::Bilinear);
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        let w = lanczos_weight(0.0, 3.0);
        assert!((w - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        let w = lanczos_weight(3.0, 3.0);
        assert!(w.abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        let w1 = lanczos_weight(1.5, 3.0);
        let w2 = lanczos_weight(-1.5, 3.0);
        assert!((w1 - w2).abs() < 1e-10);
    }
}
