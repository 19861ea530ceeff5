//! Shared test helpers: a minimal Code 128 (set B) synthesizer.
//!
//! Renders a label barcode into an in-memory PNG so end-to-end decode tests
//! need no binary fixtures. Bar/space widths follow the Code 128 standard
//! (11-module symbols, mod-103 checksum, 13-module stop pattern).

use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;

/// Code 128 bar/space width patterns for values 0..=105.
/// Each entry is six run widths summing to 11 modules.
const CODE128_PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];

/// Stop pattern: seven runs, 13 modules.
const CODE128_STOP: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

const QUIET_MODULES: usize = 10;

/// Render `text` as a Code 128 set B row of luma pixels (0 = bar).
///
/// `unit` is the module width in pixels.
pub fn code128_row(text: &str, unit: usize) -> Vec<u8> {
    assert!(unit >= 1);

    // Start B, payload, checksum.
    let mut codes: Vec<usize> = vec![104];
    for ch in text.chars() {
        let b = ch as u32;
        assert!(
            (32..=127).contains(&b),
            "Code 128 set B only covers ASCII 32..=127"
        );
        codes.push((b - 32) as usize);
    }
    let mut sum = codes[0] as u32;
    for (i, &v) in codes.iter().enumerate().skip(1) {
        sum += (v as u32) * (i as u32);
    }
    codes.push((sum % 103) as usize);

    // Module widths: quiet + symbols + stop + quiet.
    let mut modules: Vec<u8> = Vec::new();
    modules.push(QUIET_MODULES as u8);
    for &code in &codes {
        for w in CODE128_PATTERNS[code].bytes() {
            modules.push(w - b'0');
        }
    }
    modules.extend_from_slice(&CODE128_STOP);
    modules.push(QUIET_MODULES as u8);

    // Modules to pixels; the leading quiet zone is white, then alternate.
    let mut row: Vec<u8> = Vec::new();
    let mut black = false;
    for m in modules {
        let value = if black { 0 } else { 255 };
        for _ in 0..(m as usize) * unit {
            row.push(value);
        }
        black = !black;
    }
    row
}

/// Render `text` as a Code 128 barcode photo and return it as PNG bytes.
pub fn barcode_png(text: &str) -> Vec<u8> {
    let row = code128_row(text, 2);
    let width = row.len() as u32;
    let height = 60u32;

    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    for y in 0..height {
        for (x, &v) in row.iter().enumerate() {
            img.put_pixel(x as u32, y, Rgba([v, v, v, 255]));
        }
    }
    png_bytes(DynamicImage::ImageRgba8(img))
}

/// A featureless gray photo: decodable, but with no barcode in it.
pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([180, 180, 180, 255]));
    png_bytes(DynamicImage::ImageRgba8(img))
}

/// Encode an image as PNG into memory.
pub fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("PNG encoding of a test image cannot fail");
    out.into_inner()
}
