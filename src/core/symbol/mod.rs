//! # Symbol Module
//!
//! Linear barcode recognition against a single brightness raster.
//!
//! Printed asset labels carry a 1-D symbol; 2-D/matrix symbologies are not
//! valid labels in this domain and are deliberately outside the allow-list.
//! A recognized symbol whose symbology falls outside the allow-list is
//! treated exactly like not-found.

use crate::core::raster::GrayRaster;
use crate::error::SymbolError;
use rxing::common::HybridBinarizer;
use rxing::{
    BarcodeFormat, BinaryBitmap, DecodeHintType, DecodeHintValue, DecodingHintDictionary,
    Luma8LuminanceSource, MultiFormatReader, Reader,
};
use std::collections::{HashMap, HashSet};

/// The nine linear symbologies accepted on asset labels.
const LINEAR_FORMATS: [BarcodeFormat; 9] = [
    BarcodeFormat::CODE_128,
    BarcodeFormat::CODE_39,
    BarcodeFormat::CODE_93,
    BarcodeFormat::CODABAR,
    BarcodeFormat::EAN_8,
    BarcodeFormat::EAN_13,
    BarcodeFormat::ITF,
    BarcodeFormat::UPC_A,
    BarcodeFormat::UPC_E,
];

/// Outcome of a successful recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    /// Text encoded in the symbol, exactly as read.
    pub raw_text: String,
    /// Name of the recognized symbology, e.g. `CODE_128`.
    pub symbology: String,
}

/// Immutable recognizer configuration: the symbology allow-list and the
/// binarizer's try-harder flag.
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    allowed: HashSet<BarcodeFormat>,
    try_harder: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            allowed: LINEAR_FORMATS.into_iter().collect(),
            try_harder: true,
        }
    }
}

impl RecognizerConfig {
    /// Disable the slower try-harder pass. Mostly useful in tests.
    pub fn try_harder(mut self, enabled: bool) -> Self {
        self.try_harder = enabled;
        self
    }

    pub fn allows(&self, format: &BarcodeFormat) -> bool {
        self.allowed.contains(format)
    }

    fn hints(&self) -> DecodingHintDictionary {
        let mut hints: DecodingHintDictionary = HashMap::new();
        hints.insert(
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(self.allowed.clone()),
        );
        hints.insert(
            DecodeHintType::TRY_HARDER,
            DecodeHintValue::TryHarder(self.try_harder),
        );
        hints
    }
}

/// Attempts linear barcode recognition on brightness rasters.
///
/// A fresh `MultiFormatReader` is constructed per attempt, so no internal
/// reader state can leak from one orientation attempt into the next.
pub struct SymbolReader {
    config: RecognizerConfig,
    hints: DecodingHintDictionary,
}

impl Default for SymbolReader {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl SymbolReader {
    pub fn new(config: RecognizerConfig) -> Self {
        let hints = config.hints();
        Self { config, hints }
    }

    /// Binarize the raster and attempt one recognition pass.
    ///
    /// Returns [`SymbolError::NotFound`] when no recognizable pattern is
    /// present or the recognized symbology is outside the allow-list.
    pub fn recognize(&self, raster: &GrayRaster) -> Result<Recognition, SymbolError> {
        let source = Luma8LuminanceSource::new(
            raster.pixels().to_vec(),
            raster.width(),
            raster.height(),
        );
        let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

        let mut reader = MultiFormatReader::default();
        let result = reader
            .decode_with_hints(&mut bitmap, &self.hints)
            .map_err(|_| SymbolError::NotFound)?;

        // The possible-formats hint already restricts the search, but the
        // allow-list is re-checked on the result as the authoritative gate.
        let format = *result.getBarcodeFormat();
        if !self.config.allows(&format) {
            return Err(SymbolError::NotFound);
        }

        Ok(Recognition {
            raw_text: result.getText().to_string(),
            symbology: symbology_name(format).to_string(),
        })
    }
}

/// Stable wire name for a symbology.
fn symbology_name(format: BarcodeFormat) -> &'static str {
    match format {
        BarcodeFormat::CODE_128 => "CODE_128",
        BarcodeFormat::CODE_39 => "CODE_39",
        BarcodeFormat::CODE_93 => "CODE_93",
        BarcodeFormat::CODABAR => "CODABAR",
        BarcodeFormat::EAN_8 => "EAN_8",
        BarcodeFormat::EAN_13 => "EAN_13",
        BarcodeFormat::ITF => "ITF",
        BarcodeFormat::UPC_A => "UPC_A",
        BarcodeFormat::UPC_E => "UPC_E",
        _ => "UNSUPPORTED",
    }
}
