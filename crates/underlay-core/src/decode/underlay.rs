//! Decoding picked photos into underlay sources.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation};
use crate::render::SourceImage;

/// Decode JPEG or PNG bytes into an upright RGBA underlay.
///
/// The format is sniffed from the data. EXIF orientation, when present, is
/// applied so the underlay matches what the photo library shows.
///
/// # Errors
///
/// - `DecodeError::Empty` for empty input
/// - `DecodeError::UnsupportedFormat` if the format is not JPEG or PNG
/// - `DecodeError::Corrupted` if decoding fails
/// - `DecodeError::NoPixels` if the decoded image is empty
pub fn decode_underlay(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;
    match reader.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
        _ => return Err(DecodeError::UnsupportedFormat),
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    let rgba = apply_orientation(img, get_orientation(bytes)).into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::NoPixels { width, height });
    }

    tracing::debug!(width, height, "underlay decoded");
    Ok(SourceImage::from_rgba_image(rgba))
}

/// EXIF orientation of an encoded image, `Orientation::Normal` when absent
/// or unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

/// Rotate/flip a decoded image upright.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
