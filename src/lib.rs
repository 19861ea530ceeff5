//! # Label Decode
//!
//! Decodes photographed hardware asset labels into a validated identifier
//! pair (model code + asset tag).
//!
//! ## Core Philosophy
//! - **Two strategies, one schema** - barcode recognition first, vision-model
//!   OCR as fallback, both funneled through the same parser so results are
//!   indistinguishable downstream
//! - **Tolerate real photos** - arbitrary rotation, JPEG artifacts, uneven
//!   lighting
//! - **Fail with a reason** - every failure carries a stable kind and a
//!   descriptive message; a two-strategy failure reports both causes
//!
//! ## Architecture
//! The library is split into a core engine (transport-agnostic) and a thin
//! CLI:
//! - `core` - the decode pipeline (raster, symbol, ocr, identifier, pipeline)
//! - `error` - error taxonomy
//! - `cli` - command-line interface

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use crate::core::{DecodedScan, LabelDecoder};
pub use error::{ErrorKind, LabelError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
