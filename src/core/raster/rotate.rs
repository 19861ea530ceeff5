//! Orientation search: clockwise rotations of a brightness raster.
//!
//! Photographed labels arrive in unknown orientation. The reader is given
//! the four quarter-turn variants in a fixed order, upright first, because
//! upright photos are by far the common case and trying them first keeps
//! average latency down.

use crate::core::raster::GrayRaster;

/// Clockwise rotation applied to a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// Rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    const ORDER: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise90,
        Rotation::Clockwise180,
        Rotation::Clockwise270,
    ];
}

/// A brightness raster tagged with the rotation that produced it.
#[derive(Debug, Clone)]
pub struct OrientedRaster {
    pub rotation: Rotation,
    pub raster: GrayRaster,
}

/// Lazy sequence of the four oriented variants of a source raster.
///
/// Each call to [`GrayRaster::orientations`] produces an independent
/// sequence over the same source, so the search is deterministic and
/// restartable.
pub struct Orientations<'a> {
    source: &'a GrayRaster,
    next: usize,
}

impl<'a> Orientations<'a> {
    pub(super) fn new(source: &'a GrayRaster) -> Self {
        Self { source, next: 0 }
    }
}

impl Iterator for Orientations<'_> {
    type Item = OrientedRaster;

    fn next(&mut self) -> Option<Self::Item> {
        let rotation = *Rotation::ORDER.get(self.next)?;
        self.next += 1;
        Some(OrientedRaster {
            rotation,
            raster: rotate(self.source, rotation),
        })
    }
}

/// Pure geometric remap of a brightness raster.
///
/// 0° is an identity copy; 180° a point reflection; 90°/270° transpose with
/// an axis flip and swap width/height.
fn rotate(src: &GrayRaster, rotation: Rotation) -> GrayRaster {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let pixels = src.pixels();

    match rotation {
        Rotation::None => src.clone(),
        Rotation::Clockwise180 => {
            let out: Vec<u8> = pixels.iter().rev().copied().collect();
            GrayRaster::from_raw(src.width(), src.height(), out)
                .expect("180-degree remap preserves dimensions")
        }
        Rotation::Clockwise90 => {
            // Destination is h x w; source column x (bottom to top) becomes
            // destination row x.
            let mut out = vec![0u8; w * h];
            for y in 0..h {
                for x in 0..w {
                    out[x * h + (h - 1 - y)] = pixels[y * w + x];
                }
            }
            GrayRaster::from_raw(src.height(), src.width(), out)
                .expect("quarter-turn remap swaps dimensions exactly")
        }
        Rotation::Clockwise270 => {
            let mut out = vec![0u8; w * h];
            for y in 0..h {
                for x in 0..w {
                    out[(w - 1 - x) * h + y] = pixels[y * w + x];
                }
            }
            GrayRaster::from_raw(src.height(), src.width(), out)
                .expect("quarter-turn remap swaps dimensions exactly")
        }
    }
}
