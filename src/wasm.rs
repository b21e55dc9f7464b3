//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::error::LoadError;
use crate::validate::{Entry, Location};

/// Validate a shading document JSON.
/// Returns `{ status: "ok", entries }` or `{ status: "error", code, message }`.
#[wasm_bindgen]
pub fn validate_material(json: &str) -> JsValue {
    let result = validate_material_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_material_inner(json: &str) -> ValidateResult {
    match crate::validate::validate_document(json) {
        Ok(log) => ValidateResult::Ok {
            entries: log.into_iter().map(EntryDto::from).collect(),
        },
        Err(e) => ValidateResult::Error(ErrorDto::from(e)),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryDto {
    severity: String,
    code: String,
    message: String,
    locations: Vec<Location>,
}

impl From<Entry> for EntryDto {
    fn from(e: Entry) -> Self {
        EntryDto {
            severity: e.severity.to_string(),
            code: e.code().to_string(),
            message: e.message,
            locations: e.locations,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    message: String,
}

impl From<LoadError> for ErrorDto {
    fn from(e: LoadError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum ValidateResult {
    #[serde(rename = "ok")]
    Ok { entries: Vec<EntryDto> },
    #[serde(rename = "error")]
    Error(ErrorDto),
}
