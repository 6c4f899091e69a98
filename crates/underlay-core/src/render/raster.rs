//! Pixel buffers for underlay sources and exported rasters.

use std::fmt;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// An underlay image with RGBA pixel data.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a new SourceImage with the given dimensions and pixel data.
    ///
    /// A buffer of the wrong length is kept as is; such an image reports
    /// [`is_empty`](Self::is_empty) and every render or sample rejects it.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A single-colour image, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::new(width, height, pixels)
    }

    /// Create a SourceImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Width and height as floating point, for the transform math.
    pub fn size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width as f64, self.height as f64)
    }

    /// True if the buffer cannot be rendered: a zero dimension or a pixel
    /// buffer that does not match the dimensions.
    pub fn is_empty(&self) -> bool {
        self.width == 0
            || self.height == 0
            || self.pixels.len() != self.width as usize * self.height as usize * CHANNELS
    }

    /// RGBA value of the pixel at `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width as usize + x) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A square exported raster. Pixels outside the drawn underlay are fully
/// transparent.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedRaster {
    /// Side length in pixels.
    pub side: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl ExportedRaster {
    pub(crate) fn new(side: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), side as usize * side as usize * CHANNELS);
        Self { side, pixels }
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster or past the end
    /// of a short buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.side || y >= self.side {
            return None;
        }
        let idx = (y as usize * self.side as usize + x as usize) * CHANNELS;
        self.pixels
            .get(idx..idx + CHANNELS)
            .and_then(|px| px.try_into().ok())
    }

    /// Bounding box `(x0, y0, x1, y1)` (exclusive end) of every pixel with
    /// non-zero alpha, or `None` if nothing was drawn.
    pub fn occupied_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        let side = self.side as usize;
        for (i, px) in self.pixels.chunks_exact(CHANNELS).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let (x, y) = ((i % side) as u32, (i / side) as u32);
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
        bounds
    }

    /// Convert to an image::RgbaImage, consuming the raster.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.side, self.side, self.pixels)
    }

    /// Reuse the raster as a source, e.g. to re-fit an exported preview.
    pub fn into_source(self) -> SourceImage {
        SourceImage::new(self.side, self.side, self.pixels)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

impl fmt::Debug for ExportedRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedRaster")
            .field("side", &self.side)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_image_creation() {
        let img = SourceImage::filled(100, 50, [1, 2, 3, 255]);
        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixels.len(), 100 * 50 * 4);
        assert_eq!(img.pixel(99, 49), [1, 2, 3, 255]);
        assert!(!img.is_empty());
    }

    #[test]
    fn test_source_image_empty() {
        assert!(SourceImage::new(0, 0, vec![]).is_empty());
        let mismatched = SourceImage {
            width: 2,
            height: 2,
            pixels: vec![0; 3],
        };
        assert!(mismatched.is_empty());
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let img = SourceImage::filled(3, 2, [10, 20, 30, 40]);
        let rgba = img.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(SourceImage::from_rgba_image(rgba), img);
    }

    #[test]
    fn test_occupied_bounds() {
        let mut pixels = vec![0u8; 4 * 4 * 4];
        for (x, y) in [(1, 1), (2, 3)] {
            pixels[(y * 4 + x) * 4 + 3] = 255;
        }
        let raster = ExportedRaster::new(4, pixels);
        assert_eq!(raster.occupied_bounds(), Some((1, 1, 3, 4)));

        let blank = ExportedRaster::new(2, vec![0; 16]);
        assert_eq!(blank.occupied_bounds(), None);
    }

    #[test]
    fn test_raster_pixel_bounds() {
        let raster = ExportedRaster::new(2, vec![7; 16]);
        assert_eq!(raster.pixel(1, 1), Some([7, 7, 7, 7]));
        assert_eq!(raster.pixel(2, 0), None);
    }

    #[test]
    fn test_short_raster_pixel_is_none() {
        let raster = ExportedRaster {
            side: 2,
            pixels: vec![7; 10],
        };
        assert_eq!(raster.pixel(0, 0), Some([7, 7, 7, 7]));
        assert_eq!(raster.pixel(0, 1), None);
        assert_eq!(raster.pixel(1, 1), None);
    }

    #[test]
    fn test_mismatched_source_is_kept_and_empty() {
        let img = SourceImage::new(4, 4, vec![0; 10]);
        assert_eq!(img.pixels.len(), 10);
        assert!(img.is_empty());
    }

    #[test]
    fn test_raster_into_source() {
        let raster = ExportedRaster::new(2, vec![9; 16]);
        let source = raster.into_source();
        assert_eq!((source.width, source.height), (2, 2));
    }
}
