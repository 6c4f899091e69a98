//! Decoding of picked photos.
//!
//! The photo picker hands over encoded bytes; this module turns them into an
//! upright RGBA [`SourceImage`](crate::render::SourceImage) ready to be used
//! as an underlay.
//!
//! # Examples
//!
//! ```ignore
//! use underlay_core::decode::decode_underlay;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let underlay = decode_underlay(&bytes).unwrap();
//! println!("Underlay is {}x{}", underlay.width, underlay.height);
//! ```

mod types;
mod underlay;

pub use types::{DecodeError, Orientation};
pub use underlay::{decode_underlay, get_orientation};
