//! # Core Module
//!
//! The transport-agnostic label decode engine.
//!
//! ## Modules
//! - `raster` - photo decoding, luminance projection, orientation search
//! - `symbol` - linear barcode recognition
//! - `ocr` - vision-model text extraction fallback
//! - `identifier` - parsing/validation of the model-code + asset-tag pair
//! - `pipeline` - the decode orchestrator

pub mod identifier;
pub mod ocr;
pub mod pipeline;
pub mod raster;
pub mod symbol;

// Re-export commonly used types
pub use identifier::StructuredIdentifiers;
pub use ocr::{OcrConfig, OcrExtraction, OpenAiExtractor, TextExtractor};
pub use pipeline::{DecodeStrategy, DecodedScan, LabelDecoder};
pub use symbol::{Recognition, RecognizerConfig, SymbolReader};
