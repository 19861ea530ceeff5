//! # Error Module
//!
//! Error types for the label decode pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user-supplied photos - return errors instead
//! - **Explicit taxonomy** - every failure maps to a stable [`ErrorKind`]
//!   that callers can persist or route on
//! - **Fallback-aware** - when both recognition strategies are attempted
//!   and both fail, the error carries both causes

use serde::Serialize;
use thiserror::Error;

/// Stable error classification exposed to callers.
///
/// This is the wire-level `errorKind` of the output contract; the error
/// types below map onto it via [`LabelError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnreadableImage,
    SymbolNotFound,
    OcrUnavailable,
    OcrRequestFailed,
    MalformedIdentifier,
    InvalidAssetTag,
    InvalidModelCode,
}

/// Top-level pipeline error
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Symbol recognition error: {0}")]
    Symbol(#[from] SymbolError),

    #[error("OCR fallback error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// Both the symbol strategy and the OCR fallback were attempted and
    /// both failed. The message references both underlying causes so
    /// operators can see why each strategy gave up.
    #[error("Both strategies failed. Symbol: {symbol_cause}. OCR: {ocr_cause}")]
    BothStrategiesFailed {
        symbol_cause: String,
        ocr_kind: ErrorKind,
        ocr_cause: String,
    },
}

impl LabelError {
    /// Classify this error for the output contract.
    ///
    /// A combined two-strategy failure reports the OCR-stage kind, since
    /// that is the stage that ultimately ended the request.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelError::Image(_) => ErrorKind::UnreadableImage,
            LabelError::Symbol(_) => ErrorKind::SymbolNotFound,
            LabelError::Ocr(e) => e.kind(),
            LabelError::Identifier(e) => e.kind(),
            LabelError::BothStrategiesFailed { ocr_kind, .. } => *ocr_kind,
        }
    }
}

/// Errors from decoding the uploaded photo bytes into a raster
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Unable to read image: {reason}")]
    Unreadable { reason: String },

    #[error("Image has zero width or height")]
    EmptyImage,
}

/// Errors from the linear barcode reader
#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("No supported linear barcode found in the supplied image")]
    NotFound,
}

/// Errors from the OCR fallback adapter
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR fallback is not configured (missing API credentials)")]
    Unavailable,

    #[error("OCR request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("OCR response could not be interpreted: {reason}")]
    UnparseableResponse { reason: String },
}

impl OcrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OcrError::Unavailable => ErrorKind::OcrUnavailable,
            OcrError::RequestFailed { .. } | OcrError::UnparseableResponse { .. } => {
                ErrorKind::OcrRequestFailed
            }
        }
    }
}

/// Errors from parsing decoded text into structured identifiers
#[derive(Error, Debug)]
pub enum IdentifierError {
    #[error("Decoded text \"{raw}\" does not contain a model code and an asset tag")]
    Malformed { raw: String },

    #[error("\"{candidate}\" is not a valid asset tag (expected 3 letters + 4-5 digits)")]
    InvalidAssetTag { candidate: String },

    #[error("\"{candidate}\" is not a valid model code (expected 4-16 letters/digits/hyphens)")]
    InvalidModelCode { candidate: String },
}

impl IdentifierError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentifierError::Malformed { .. } => ErrorKind::MalformedIdentifier,
            IdentifierError::InvalidAssetTag { .. } => ErrorKind::InvalidAssetTag,
            IdentifierError::InvalidModelCode { .. } => ErrorKind::InvalidModelCode,
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, LabelError>;
