//! The underlay pose: rotation, scale, and translation relative to the
//! default centered placement.

use std::f64::consts::TAU;

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Cumulative on-screen manipulation of the underlay.
///
/// Rotation is in radians and is not wrapped; use
/// [`display_rotation`](Pose::display_rotation) when a value in `[0, 2π)` is
/// needed. Translation is in canvas (screen) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotation: f64,
    /// Positive in every pose the accumulator produces. Exports reject a
    /// hand-built pose with a non-positive or non-finite scale.
    pub scale: f64,
    pub translation: Vec2,
}

impl Pose {
    /// Centered, unscaled, unrotated.
    pub const IDENTITY: Pose = Pose {
        rotation: 0.0,
        scale: 1.0,
        translation: Vec2::ZERO,
    };

    /// Build a pose as given. `scale` is not checked here; see
    /// [`compose_export_transform`](crate::transform::compose_export_transform).
    pub fn new(rotation: f64, scale: f64, translation: Vec2) -> Self {
        Self {
            rotation,
            scale,
            translation,
        }
    }

    /// Rotation reduced to `[0, 2π)`.
    pub fn display_rotation(&self) -> f64 {
        self.rotation.rem_euclid(TAU)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_default_is_identity() {
        let pose = Pose::default();
        assert!(pose.is_identity());
        assert_eq!(pose.scale, 1.0);
        assert_eq!(pose.translation, Vec2::ZERO);
    }

    #[test]
    fn test_display_rotation_wraps() {
        let pose = Pose::new(5.0 * PI / 2.0, 1.0, Vec2::ZERO);
        assert!((pose.display_rotation() - PI / 2.0).abs() < 1e-12);

        let pose = Pose::new(-PI / 2.0, 1.0, Vec2::ZERO);
        assert!((pose.display_rotation() - 3.0 * PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_not_wrapped_internally() {
        let pose = Pose::new(3.0 * TAU, 1.0, Vec2::ZERO);
        assert_eq!(pose.rotation, 3.0 * TAU);
        assert!(!pose.is_identity());
    }
}
