//! Raster Pixel Buffers
//!
//! Conversion between encoded image resources and mutable RGBA buffers.
//! Pure data-shape work: no timing concerns live here.

use std::io::Cursor;
use thiserror::Error;

/// Bytes per interleaved RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors from the encoded-bytes side of the adapter.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The input bytes are not a decodable image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// A decoded image: dimensions plus interleaved RGBA bytes.
///
/// The shape invariant `pixels.len() == width * height * 4` holds at all
/// times; violating it is a contract error, not a recoverable condition,
/// so the constructor panics rather than returning a `Result`. Fields are
/// private to keep the invariant unbreakable: pixel *contents* are
/// mutable through [`RasterImage::pixels_mut`], the shape is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Build a raster from parts.
    ///
    /// # Panics
    /// Panics if either dimension is zero or `pixels.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert!(width > 0 && height > 0, "raster dimensions must be non-zero");
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "pixel buffer length must be width * height * 4"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode an encoded image resource into an RGBA raster.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new(width, height, rgba.into_raw()))
    }

    /// Encode the raster as a standalone PNG resource.
    ///
    /// Encoding a well-formed raster into memory cannot fail, so this
    /// returns the bytes directly; an internal failure would be a
    /// contract bug, not an error the caller can act on.
    pub fn encode_png(&self) -> Vec<u8> {
        let rgba = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("pixel buffer length matches dimensions");
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("png encoding of an in-memory raster cannot fail");
        buf
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable view of the RGBA bytes. The slice cannot change length,
    /// so the shape invariant survives any mutation.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}
