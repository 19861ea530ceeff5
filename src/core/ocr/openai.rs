//! OpenAI-compatible vision extractor.
//!
//! Sends the original compressed photo as a base64 data URL to a
//! chat-completions endpoint and asks the model for a strict JSON object
//! with `model_code` and `asset_code` fields.

use super::{FieldDiagnostic, FieldStatus, OcrConfig, OcrExtraction, TextExtractor};
use crate::error::OcrError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

/// Confidence below this is flagged as low-confidence rather than ok.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

const EXTRACTION_PROMPT: &str = "You are reading a printed hardware asset label. \
Extract two fields: the model code (letters, digits and hyphens, printed above \
or before the asset tag) and the asset code (exactly 3 letters followed by 4 or \
5 digits). Respond with only a JSON object of the form \
{\"model_code\": {\"value\": string or null, \"confidence\": number 0-1}, \
\"asset_code\": {\"value\": string or null, \"confidence\": number 0-1}}. \
Use null for a field you cannot read.";

/// Vision-model extractor backed by an OpenAI-compatible API.
#[derive(Debug)]
pub struct OpenAiExtractor {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiExtractor {
    /// Build an extractor from configuration.
    ///
    /// Fails with [`OcrError::Unavailable`] when no API key is configured,
    /// so callers can treat construction failure as "capability absent".
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let api_key = config.api_key.clone().ok_or(OcrError::Unavailable)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcrError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model,
        })
    }
}

#[async_trait]
impl TextExtractor for OpenAiExtractor {
    async fn extract_text(
        &self,
        image: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<OcrExtraction, OcrError> {
        let data_url = format!("data:{};base64,{}", content_type, BASE64.encode(image));
        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": EXTRACTION_PROMPT },
                { "role": "user", "content": [
                    { "type": "text",
                      "text": format!("Read the label in this photo (file name: {filename}).") },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]}
            ]
        });

        debug!(model = %self.model, filename, "submitting OCR fallback request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(OcrError::RequestFailed {
                reason: format!("extraction endpoint returned {status}: {detail}"),
            });
        }

        let completion: ChatCompletion =
            response
                .json()
                .await
                .map_err(|e| OcrError::UnparseableResponse {
                    reason: e.to_string(),
                })?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| OcrError::UnparseableResponse {
                reason: "completion contained no choices".to_string(),
            })?;

        let payload: ExtractionPayload =
            serde_json::from_str(content).map_err(|e| OcrError::UnparseableResponse {
                reason: format!("model reply was not the requested JSON object: {e}"),
            })?;

        Ok(build_extraction(payload))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractionPayload {
    #[serde(default)]
    model_code: FieldPayload,
    #[serde(default)]
    asset_code: FieldPayload,
}

#[derive(Debug, Default, Deserialize)]
struct FieldPayload {
    value: Option<String>,
    confidence: Option<f64>,
}

/// Convert the model's reply into diagnostics and a combined text line.
fn build_extraction(payload: ExtractionPayload) -> OcrExtraction {
    let mut fields = BTreeMap::new();
    fields.insert("model_code".to_string(), diagnose(payload.model_code));
    fields.insert("asset_code".to_string(), diagnose(payload.asset_code));

    let combined_text = ["model_code", "asset_code"]
        .iter()
        .filter_map(|name| fields[*name].value.as_deref())
        .collect::<Vec<_>>()
        .join(" ");

    OcrExtraction {
        combined_text,
        field_diagnostics: fields,
    }
}

fn diagnose(field: FieldPayload) -> FieldDiagnostic {
    let confidence = field.confidence.unwrap_or(0.0).clamp(0.0, 1.0);
    let value = field
        .value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let status = match &value {
        None => FieldStatus::Missing,
        Some(v) if !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') => {
            FieldStatus::Invalid
        }
        Some(_) if confidence < LOW_CONFIDENCE_THRESHOLD => FieldStatus::LowConfidence,
        Some(_) => FieldStatus::Ok,
    };

    FieldDiagnostic {
        value,
        status,
        confidence,
    }
}
