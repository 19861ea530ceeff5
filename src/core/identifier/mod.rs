//! # Identifier Module
//!
//! Parses raw decoded label text into a validated model-code / asset-tag
//! pair. Both recognition strategies feed through this single parser, so a
//! scan record looks the same whether the text came off a barcode or out of
//! the OCR fallback.
//!
//! Label format: one or more model-code tokens followed by a final
//! asset-tag token, e.g. `"E3012804 HBJ04724"`.

use crate::error::IdentifierError;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Asset tag: exactly 3 uppercase letters followed by 4-5 digits.
static ASSET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}[0-9]{4,5}$").expect("asset tag pattern is valid"));

/// Model code: 4-16 characters of uppercase letters, digits, and hyphen.
static MODEL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{4,16}$").expect("model code pattern is valid"));

/// A validated, normalized identifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredIdentifiers {
    /// The decoded text as received, before normalization.
    pub raw_code: String,
    pub model_code: String,
    pub asset_tag: String,
    /// Always `model_code + " " + asset_tag`.
    pub combined_code: String,
}

/// Parse and validate raw decoded text into structured identifiers.
///
/// Whitespace runs are collapsed, the last token is taken as the asset tag
/// and the remaining tokens are concatenated into the model code. All
/// validation runs on uppercased forms.
pub fn parse_identifiers(raw: &str) -> Result<StructuredIdentifiers, IdentifierError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(IdentifierError::Malformed {
            raw: raw.trim().to_string(),
        });
    }

    let asset_tag = tokens[tokens.len() - 1].to_uppercase();
    if !ASSET_TAG.is_match(&asset_tag) {
        return Err(IdentifierError::InvalidAssetTag {
            candidate: asset_tag,
        });
    }

    let model_candidate = tokens[..tokens.len() - 1].concat().to_uppercase();
    let model_code = strip_reader_artifact(&model_candidate);
    if !MODEL_CODE.is_match(model_code) {
        return Err(IdentifierError::InvalidModelCode {
            candidate: model_code.to_string(),
        });
    }

    Ok(StructuredIdentifiers {
        raw_code: raw.trim().to_string(),
        combined_code: format!("{} {}", model_code, asset_tag),
        model_code: model_code.to_string(),
        asset_tag,
    })
}

/// Drop a single leading digit `1` from the model-code candidate.
///
/// The barcode reader occasionally prepends a stray `1` to the model code
/// on this label stock. The heuristic is kept out of the validation pattern
/// itself so it can be adjusted or removed independently; its generality
/// past the observed label format is unverified.
fn strip_reader_artifact(candidate: &str) -> &str {
    match candidate.strip_prefix('1') {
        Some(rest) if !rest.is_empty() => rest,
        _ => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifierError;

    #[test]
    fn parses_plain_pair() {
        let ids = parse_identifiers("E3012804 HBJ04724").unwrap();
        assert_eq!(ids.model_code, "E3012804");
        assert_eq!(ids.asset_tag, "HBJ04724");
        assert_eq!(ids.combined_code, "E3012804 HBJ04724");
        assert_eq!(ids.raw_code, "E3012804 HBJ04724");
    }

    #[test]
    fn strips_leading_digit_artifact() {
        let ids = parse_identifiers("1E3012804 HBJ04724").unwrap();
        assert_eq!(ids.model_code, "E3012804");
        assert_eq!(ids.asset_tag, "HBJ04724");
        assert_eq!(ids.combined_code, "E3012804 HBJ04724");
        // raw text is preserved untouched
        assert_eq!(ids.raw_code, "1E3012804 HBJ04724");
    }

    #[test]
    fn combined_code_invariant_holds() {
        let ids = parse_identifiers("AB-500 XYZ1234").unwrap();
        assert_eq!(
            ids.combined_code,
            format!("{} {}", ids.model_code, ids.asset_tag)
        );
    }

    #[test]
    fn collapses_whitespace_and_joins_model_tokens() {
        let ids = parse_identifiers("  E30 12804   hbj04724 \n").unwrap();
        assert_eq!(ids.model_code, "E3012804");
        assert_eq!(ids.asset_tag, "HBJ04724");
    }

    #[test]
    fn lowercase_input_is_uppercased() {
        let ids = parse_identifiers("e3012804 hbj04724").unwrap();
        assert_eq!(ids.model_code, "E3012804");
        assert_eq!(ids.asset_tag, "HBJ04724");
    }

    #[test]
    fn accepts_four_and_five_digit_asset_tags() {
        assert!(parse_identifiers("MODEL-1 ABC1234").is_ok());
        assert!(parse_identifiers("MODEL-1 HBJ04724").is_ok());
    }

    #[test]
    fn rejects_two_letter_asset_tag() {
        let err = parse_identifiers("MODEL-1 AB1234").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidAssetTag { .. }));
    }

    #[test]
    fn rejects_short_asset_tag() {
        let err = parse_identifiers("MODEL-1 HBJ047").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidAssetTag { .. }));
    }

    #[test]
    fn rejects_single_token() {
        let err = parse_identifiers("HBJ04724").unwrap_err();
        assert!(matches!(err, IdentifierError::Malformed { .. }));
    }

    #[test]
    fn rejects_blank_text() {
        let err = parse_identifiers("   ").unwrap_err();
        assert!(matches!(err, IdentifierError::Malformed { .. }));
    }

    #[test]
    fn rejects_short_model_code() {
        // After stripping the artifact digit only "E3" remains.
        let err = parse_identifiers("1E3 HBJ04724").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidModelCode { .. }));
    }

    #[test]
    fn rejects_model_code_with_punctuation() {
        let err = parse_identifiers("E30_12804 HBJ04724").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidModelCode { .. }));
    }

    #[test]
    fn keeps_lone_digit_model_candidate_intact() {
        // A candidate of just "1" is not stripped to empty; it fails the
        // length rule instead.
        let err = parse_identifiers("1 HBJ04724").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidModelCode { .. }));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let ids = parse_identifiers("E3012804 HBJ04724").unwrap();
        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json["modelCode"], "E3012804");
        assert_eq!(json["assetTag"], "HBJ04724");
        assert_eq!(json["combinedCode"], "E3012804 HBJ04724");
        assert_eq!(json["rawCode"], "E3012804 HBJ04724");
    }
}
