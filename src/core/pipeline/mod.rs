//! # Pipeline Module
//!
//! The decode orchestrator: ties the raster stages, the symbol reader, the
//! OCR fallback and the identifier parser into one request-scoped decode.
//!
//! ## Flow
//! 1. decode photo bytes into a color raster (fatal on failure - an
//!    unreadable image cannot be retried by either strategy)
//! 2. project to a brightness raster
//! 3. fold the symbol reader over the four orientations, short-circuiting
//!    on the first recognition
//! 4. parse recognized text into structured identifiers
//! 5. only if the symbol strategy failed: submit the original bytes to the
//!    OCR fallback (when configured) and parse its combined text
//!
//! Each decode call is self-contained; the decoder holds no per-request
//! state and can be shared across concurrent requests.

use crate::core::identifier::{parse_identifiers, StructuredIdentifiers};
use crate::core::ocr::{OcrExtraction, TextExtractor};
use crate::core::raster::{decode_image, GrayRaster};
use crate::core::symbol::{Recognition, RecognizerConfig, SymbolReader};
use crate::error::{LabelError, Result, SymbolError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Which strategy produced a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    Symbol,
    Ocr,
}

/// A successful decode, ready for the persistence layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedScan {
    #[serde(flatten)]
    pub identifiers: StructuredIdentifiers,
    pub strategy: DecodeStrategy,
    /// Symbology name when the symbol strategy succeeded, else `null`.
    pub symbology: Option<String>,
    /// Field diagnostics when the OCR strategy succeeded, else `null`.
    pub ocr_diagnostics: Option<OcrExtraction>,
}

/// Builder for [`LabelDecoder`]
pub struct LabelDecoderBuilder {
    recognizer: RecognizerConfig,
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl LabelDecoderBuilder {
    pub fn new() -> Self {
        Self {
            recognizer: RecognizerConfig::default(),
            extractor: None,
        }
    }

    /// Override the symbol recognizer configuration.
    pub fn recognizer(mut self, config: RecognizerConfig) -> Self {
        self.recognizer = config;
        self
    }

    /// Attach the OCR fallback capability. Without one, symbol-stage
    /// failures are surfaced directly.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn build(self) -> LabelDecoder {
        LabelDecoder {
            reader: SymbolReader::new(self.recognizer),
            extractor: self.extractor,
        }
    }
}

impl Default for LabelDecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The label decode pipeline.
pub struct LabelDecoder {
    reader: SymbolReader,
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl Default for LabelDecoder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LabelDecoder {
    pub fn builder() -> LabelDecoderBuilder {
        LabelDecoderBuilder::new()
    }

    /// Whether the OCR fallback capability is attached.
    pub fn has_ocr_fallback(&self) -> bool {
        self.extractor.is_some()
    }

    /// Decode one photographed label into structured identifiers.
    ///
    /// `filename` and `content_type` are passed through to the OCR fallback
    /// for its own format inference; the pipeline itself only interprets
    /// the bytes.
    pub async fn decode(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<DecodedScan> {
        // Stage 1-2: decode and project. Unreadable input is fatal and
        // never reaches the OCR stage.
        let raster = decode_image(bytes)?;
        let luma = raster.to_luma();
        debug!(
            width = luma.width(),
            height = luma.height(),
            "decoded photo into brightness raster"
        );

        // Stage 3-4: symbol strategy across the four orientations.
        let symbol_failure = match self.try_symbol(&luma) {
            Ok(scan) => {
                info!(
                    symbology = scan.symbology.as_deref().unwrap_or(""),
                    combined = %scan.identifiers.combined_code,
                    "label decoded via symbol strategy"
                );
                return Ok(scan);
            }
            Err(e) => e,
        };

        // Stage 5: OCR fallback, only when configured.
        let Some(extractor) = &self.extractor else {
            debug!("OCR fallback not configured; surfacing symbol-stage error");
            return Err(symbol_failure);
        };

        match self.try_ocr(extractor.as_ref(), bytes, filename, content_type).await {
            Ok(scan) => {
                info!(
                    combined = %scan.identifiers.combined_code,
                    "label decoded via OCR fallback"
                );
                Ok(scan)
            }
            Err(ocr_failure) => Err(LabelError::BothStrategiesFailed {
                symbol_cause: symbol_failure.to_string(),
                ocr_kind: ocr_failure.kind(),
                ocr_cause: ocr_failure.to_string(),
            }),
        }
    }

    /// Try the symbol strategy: first recognition wins.
    ///
    /// A parse failure on a genuinely recognized symbol does not retry
    /// further orientations - the symbol was read, and re-reading it in
    /// another orientation would not change the text.
    fn try_symbol(&self, luma: &GrayRaster) -> std::result::Result<DecodedScan, LabelError> {
        let recognition = self.recognize_any_orientation(luma)?;
        debug!(
            symbology = %recognition.symbology,
            raw = %recognition.raw_text,
            "symbol recognized"
        );

        let identifiers = parse_identifiers(&recognition.raw_text)?;
        Ok(DecodedScan {
            identifiers,
            strategy: DecodeStrategy::Symbol,
            symbology: Some(recognition.symbology),
            ocr_diagnostics: None,
        })
    }

    /// Fold the reader over the orientation sequence, short-circuiting on
    /// the first success. All four failing collapses into a single
    /// not-found, since every orientation fails for the same underlying
    /// absence of a symbol.
    fn recognize_any_orientation(
        &self,
        luma: &GrayRaster,
    ) -> std::result::Result<Recognition, SymbolError> {
        let mut last = SymbolError::NotFound;
        for oriented in luma.orientations() {
            match self.reader.recognize(&oriented.raster) {
                Ok(recognition) => {
                    debug!(
                        rotation = oriented.rotation.degrees(),
                        "recognition succeeded"
                    );
                    return Ok(recognition);
                }
                Err(e) => {
                    debug!(
                        rotation = oriented.rotation.degrees(),
                        "no symbol at this orientation"
                    );
                    last = e;
                }
            }
        }
        Err(last)
    }

    /// Try the OCR fallback on the original compressed bytes.
    async fn try_ocr(
        &self,
        extractor: &dyn TextExtractor,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
    ) -> std::result::Result<DecodedScan, LabelError> {
        let extraction = extractor.extract_text(bytes, filename, content_type).await?;
        debug!(combined = %extraction.combined_text, "OCR extraction returned");

        let identifiers = parse_identifiers(&extraction.combined_text)?;
        Ok(DecodedScan {
            identifiers,
            strategy: DecodeStrategy::Ocr,
            symbology: None,
            ocr_diagnostics: Some(extraction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ocr::{FieldDiagnostic, FieldStatus};
    use crate::error::{ErrorKind, OcrError};
    use async_trait::async_trait;
    use image::{DynamicImage, RgbaImage};
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Extractor stub returning a fixed reply.
    struct FixedExtractor {
        reply: std::result::Result<String, ()>,
        calls: AtomicUsize,
    }

    impl FixedExtractor {
        fn text(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract_text(
            &self,
            _image: &[u8],
            _filename: &str,
            _content_type: &str,
        ) -> std::result::Result<OcrExtraction, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(OcrExtraction {
                    combined_text: text.clone(),
                    field_diagnostics: BTreeMap::from([(
                        "asset_code".to_string(),
                        FieldDiagnostic {
                            value: Some(text.clone()),
                            status: FieldStatus::Ok,
                            confidence: 0.9,
                        },
                    )]),
                }),
                Err(()) => Err(OcrError::RequestFailed {
                    reason: "stubbed transport error".to_string(),
                }),
            }
        }
    }

    /// A featureless gray photo: decodable, but carries no barcode.
    fn blank_photo() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            64,
            64,
            image::Rgba([180, 180, 180, 255]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn unreadable_bytes_fail_fast_without_ocr() {
        let extractor = Arc::new(FixedExtractor::text("E3012804 HBJ04724"));
        let decoder = LabelDecoder::builder()
            .extractor(extractor.clone())
            .build();

        let err = decoder
            .decode(b"not an image at all", "bad.jpg", "image/jpeg")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnreadableImage);
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_fallback_surfaces_symbol_error() {
        let decoder = LabelDecoder::default();
        let err = decoder
            .decode(&blank_photo(), "blank.png", "image/png")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
    }

    #[tokio::test]
    async fn fallback_decodes_when_no_symbol_present() {
        let extractor = Arc::new(FixedExtractor::text("1E3012804 HBJ04724"));
        let decoder = LabelDecoder::builder()
            .extractor(extractor.clone())
            .build();

        let scan = decoder
            .decode(&blank_photo(), "label.png", "image/png")
            .await
            .unwrap();

        assert_eq!(scan.strategy, DecodeStrategy::Ocr);
        assert_eq!(scan.identifiers.model_code, "E3012804");
        assert_eq!(scan.identifiers.asset_tag, "HBJ04724");
        assert_eq!(scan.identifiers.combined_code, "E3012804 HBJ04724");
        assert!(scan.symbology.is_none());
        assert!(scan.ocr_diagnostics.is_some());
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn both_failures_reference_both_causes() {
        let decoder = LabelDecoder::builder()
            .extractor(Arc::new(FixedExtractor::failing()))
            .build();

        let err = decoder
            .decode(&blank_photo(), "blank.png", "image/png")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OcrRequestFailed);
        let message = err.to_string();
        assert!(message.contains("linear barcode"));
        assert!(message.contains("transport error"));
    }

    #[tokio::test]
    async fn blank_ocr_text_yields_malformed_identifier() {
        let decoder = LabelDecoder::builder()
            .extractor(Arc::new(FixedExtractor::text("")))
            .build();

        let err = decoder
            .decode(&blank_photo(), "blank.png", "image/png")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedIdentifier);
    }

    #[tokio::test]
    async fn scan_serializes_to_output_contract() {
        let decoder = LabelDecoder::builder()
            .extractor(Arc::new(FixedExtractor::text("1E3012804 HBJ04724")))
            .build();

        let scan = decoder
            .decode(&blank_photo(), "label.png", "image/png")
            .await
            .unwrap();

        let json = serde_json::to_value(&scan).unwrap();
        assert_eq!(json["strategy"], "ocr");
        assert_eq!(json["modelCode"], "E3012804");
        assert_eq!(json["assetTag"], "HBJ04724");
        assert_eq!(json["combinedCode"], "E3012804 HBJ04724");
        assert!(json["symbology"].is_null());
        assert!(json["ocrDiagnostics"].is_object());
    }
}
