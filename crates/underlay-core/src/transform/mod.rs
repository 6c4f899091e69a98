//! Placement transforms: export composition and expanded-canvas rotation.
//!
//! # Coordinate System
//!
//! - Output and source pixel coordinates have their origin at the top-left,
//!   y pointing down
//! - Positive rotation angles are clockwise on screen
//! - Pose translations are in reference canvas units and are scaled into
//!   output pixels by `output_side / canvas_length`

mod compose;
mod rotation;

pub use compose::{compose_export_transform, ExportTransform, TransformComposer};
pub use rotation::{compute_rotated_bounds, rotate_image};
