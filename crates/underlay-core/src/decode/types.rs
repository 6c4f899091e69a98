//! Decode errors and EXIF orientation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from turning picked photo bytes into a [`SourceImage`](crate::render::SourceImage).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty image data")]
    Empty,

    /// The bytes are not in a supported format (JPEG or PNG).
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// The format was recognised but the data could not be decoded.
    #[error("Corrupted or incomplete image: {0}")]
    Corrupted(String),

    /// The decoded image has a zero dimension.
    #[error("Image has no pixels ({width}x{height})")]
    NoPixels { width: u32, height: u32 },
}

/// EXIF orientation tag (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Stored upright.
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Mirrored across the top-left to bottom-right diagonal.
    Transpose = 5,
    Rotate90CW = 6,
    /// Mirrored across the top-right to bottom-left diagonal.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// True when correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            // 1 and out-of-range tags are treated as upright
            _ => Orientation::Normal,
        }
    }
}
