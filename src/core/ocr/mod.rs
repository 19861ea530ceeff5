//! # OCR Module
//!
//! Vision-model text extraction, used as the fallback strategy when no
//! linear barcode can be read in any orientation.
//!
//! The pipeline depends only on the [`TextExtractor`] capability; the
//! bundled [`OpenAiExtractor`] implements it against an OpenAI-compatible
//! vision endpoint. Availability is resolved from configuration (presence
//! of an API key) - transport details and credentials never leak into the
//! rest of the pipeline.

mod openai;

pub use openai::OpenAiExtractor;

use crate::error::OcrError;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Recognition state of a single extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldStatus {
    Ok,
    Missing,
    LowConfidence,
    Invalid,
}

/// Per-field diagnostic reported by the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiagnostic {
    pub value: Option<String>,
    pub status: FieldStatus,
    pub confidence: f64,
}

/// Structured result of a vision-model extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrExtraction {
    /// All extracted field values joined into one parseable string.
    pub combined_text: String,
    /// Diagnostics keyed by field name (`model_code`, `asset_code`).
    pub field_diagnostics: BTreeMap<String, FieldDiagnostic>,
}

/// Abstract text-extraction capability.
///
/// Takes the original compressed photo bytes - not the rotated rasters,
/// since the remote service performs its own orientation handling - plus
/// filename/content-type metadata for the service's format inference.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(
        &self,
        image: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<OcrExtraction, OcrError>;
}

/// Configuration for the OpenAI-backed extractor.
///
/// The capability is available only when an API key is present.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl OcrConfig {
    /// Resolve configuration from the environment.
    ///
    /// `OPENAI_API_KEY` gates availability; `LABEL_OCR_ENDPOINT`,
    /// `LABEL_OCR_MODEL` and `LABEL_OCR_TIMEOUT_SECS` override defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            endpoint: std::env::var("LABEL_OCR_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("LABEL_OCR_MODEL").unwrap_or(defaults.model),
            timeout: std::env::var("LABEL_OCR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Whether the fallback capability is configured.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
