//! Photo decoding with a format-specific fast path.
//!
//! Uses zune-jpeg for JPEG payloads (1.5-2x faster than image crate),
//! falls back to the image crate's format guessing for everything else.
//! Input is the raw upload body; nothing here touches the filesystem.

use crate::core::raster::RgbaRaster;
use crate::error::ImageError;
use image::GenericImageView;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// JPEG payloads start with the SOI marker.
fn looks_like_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 3 && bytes[0] == 0xFF && bytes[1] == 0xD8 && bytes[2] == 0xFF
}

/// Decode compressed photo bytes into a color raster.
///
/// Fails with [`ImageError::Unreadable`] when the bytes cannot be parsed as
/// any supported photographic format, and [`ImageError::EmptyImage`] when a
/// parseable stream declares zero dimensions.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaRaster, ImageError> {
    if looks_like_jpeg(bytes) {
        if let Ok(raster) = decode_jpeg(bytes) {
            return Ok(raster);
        }
        // Damaged JPEG markers sometimes still parse through the image
        // crate's more tolerant decoder.
    }
    decode_fallback(bytes)
}

/// Fast JPEG decoding using zune-jpeg
fn decode_jpeg(bytes: &[u8]) -> Result<RgbaRaster, ImageError> {
    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGBA);
    let mut decoder = JpegDecoder::new_with_options(bytes, options);

    let pixels = decoder.decode().map_err(|e| ImageError::Unreadable {
        reason: format!("zune-jpeg decode failed: {:?}", e),
    })?;

    let info = decoder.info().ok_or_else(|| ImageError::Unreadable {
        reason: "JPEG stream carried no dimension info".to_string(),
    })?;

    if info.width == 0 || info.height == 0 {
        return Err(ImageError::EmptyImage);
    }

    let width = info.width as u32;
    let height = info.height as u32;

    // zune honors the requested RGBA output for baseline and progressive
    // JPEGs; anything else goes through the fallback decoder.
    let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGBA);
    if out_colorspace != ColorSpace::RGBA {
        return decode_fallback(bytes);
    }

    RgbaRaster::from_raw(width, height, pixels).ok_or_else(|| ImageError::Unreadable {
        reason: "JPEG pixel buffer did not match declared dimensions".to_string(),
    })
}

/// Fallback to the image crate for non-JPEG formats
fn decode_fallback(bytes: &[u8]) -> Result<RgbaRaster, ImageError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| ImageError::Unreadable {
        reason: e.to_string(),
    })?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::EmptyImage);
    }

    let rgba = decoded.to_rgba8();
    RgbaRaster::from_raw(width, height, rgba.into_raw()).ok_or_else(|| {
        ImageError::Unreadable {
            reason: "decoded pixel buffer did not match declared dimensions".to_string(),
        }
    })
}
