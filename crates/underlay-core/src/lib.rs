//! Underlay Core - photo underlay pipeline
//!
//! This crate places a photo underneath a square drawing canvas and exports it
//! at a higher resolution than the screen:
//!
//! - [`gesture`] accumulates rotate / pinch / drag gestures into a [`Pose`]
//! - [`fit`] computes the aspect-fit scale of a photo into the canvas
//! - [`transform`] composes pose, fit and output size into one affine map
//! - [`render`] resamples the photo into a square RGBA raster
//! - [`session`] ties it together for a single editing session
//!
//! The on-screen preview and the exported raster are produced by the same
//! composer, so an export is the preview scaled by `output_side / canvas_length`.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fit;
pub mod gesture;
pub mod pose;
pub mod render;
pub mod session;
pub mod transform;

pub use config::{CanvasConfig, ExportResolution};
pub use error::{ConfigError, ExportError};
pub use fit::{compute_fit_scale, AspectFit};
pub use gesture::{GestureEvent, PoseAccumulator};
pub use pose::Pose;
pub use render::{render, ExportedRaster, InterpolationFilter, SourceImage};
pub use session::{render_underlay, ExportJob, ExportSink, Mode, UnderlaySession};
pub use transform::{compose_export_transform, ExportTransform, TransformComposer};
