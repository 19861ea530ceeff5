//! # Raster Module
//!
//! In-memory raster types for the decode pipeline.
//!
//! Two pixel layouts exist: [`RgbaRaster`] (4 bytes/pixel, straight from the
//! image decoder) and [`GrayRaster`] (1 byte/pixel, produced by the luminance
//! projection). Every transform returns a fresh raster; nothing is mutated
//! in place, so stages can hold references without aliasing surprises.

mod decode;
mod rotate;

pub use decode::decode_image;
pub use rotate::{OrientedRaster, Orientations, Rotation};

/// A decoded color raster, 4 bytes per pixel (R, G, B, A).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaRaster {
    /// Wrap raw RGBA bytes. Returns `None` when the buffer length does not
    /// match `width * height * 4` or either dimension is zero.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Project to a single-channel brightness raster.
    ///
    /// Per pixel: `(r + 2g + b) >> 2` - a green-weighted mix. Green dominates
    /// perceived luminance, and the integer form is cheap and adequate for a
    /// binarizing barcode reader downstream.
    pub fn to_luma(&self) -> GrayRaster {
        let count = (self.width as usize) * (self.height as usize);
        let mut luma = Vec::with_capacity(count);
        for px in self.pixels.chunks_exact(4) {
            let r = px[0] as u16;
            let g = px[1] as u16;
            let b = px[2] as u16;
            luma.push(((r + 2 * g + b) >> 2) as u8);
        }
        GrayRaster {
            width: self.width,
            height: self.height,
            pixels: luma,
        }
    }
}

/// A single-channel brightness raster, 1 byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayRaster {
    /// Wrap raw luma bytes. Returns `None` on dimension/length mismatch.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the raster, returning the raw luma buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The four clockwise rotations of this raster, upright first.
    ///
    /// Lazy and restartable: calling this again yields an identical,
    /// independent sequence.
    pub fn orientations(&self) -> Orientations<'_> {
        Orientations::new(self)
    }
}
