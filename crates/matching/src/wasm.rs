//! WASM bindings for the browser front end.
//!
//! Text arguments are optional so that `null`/`undefined` from JavaScript
//! behave like empty input. Structured results cross the boundary as JSON.

use crate::{ReferenceLists, ScanOptions};
use wasm_bindgen::prelude::*;

fn text_or_empty(text: &Option<String>) -> &str {
    text.as_deref().unwrap_or("")
}

fn parse_list(json: &str) -> Result<Vec<String>, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Clean raw OCR text.
#[wasm_bindgen]
pub fn clean_text(raw: Option<String>) -> String {
    crate::clean(text_or_empty(&raw))
}

/// Tokenize already cleaned text.
///
/// # Returns
/// JSON array of tokens
#[wasm_bindgen]
pub fn tokenize_text(cleaned: Option<String>) -> Result<String, JsValue> {
    to_json(&crate::tokenize(text_or_empty(&cleaned)))
}

/// Clean and tokenize raw OCR text.
///
/// # Returns
/// JSON array of tokens
#[wasm_bindgen]
pub fn normalize_text(raw: Option<String>) -> Result<String, JsValue> {
    to_json(&crate::normalize(text_or_empty(&raw)))
}

/// Quick ingredient parse with stop words removed.
///
/// # Returns
/// JSON array of ingredients
#[wasm_bindgen]
pub fn parse_ingredients(raw: Option<String>) -> Result<String, JsValue> {
    to_json(&crate::parse_ingredients(text_or_empty(&raw)))
}

/// Extract candidate ingredient names from document text.
///
/// # Returns
/// JSON array of unique candidates
#[wasm_bindgen]
pub fn extract_candidates(text: Option<String>) -> Result<String, JsValue> {
    to_json(&crate::extract_candidates(text_or_empty(&text)))
}

/// Exact scan of tokens against a reference list.
///
/// # Arguments
/// * `tokens_json` - JSON array of tokens
/// * `reference_json` - JSON array of intolerance item names
///
/// # Returns
/// JSON scan report
#[wasm_bindgen]
pub fn scan_tokens(tokens_json: &str, reference_json: &str) -> Result<String, JsValue> {
    let tokens = parse_list(tokens_json)?;
    let reference = parse_list(reference_json)?;
    to_json(&crate::scan_with(&tokens, &reference, &ScanOptions::default()))
}

/// Containment test of free text against a reference list.
///
/// # Returns
/// JSON test report
#[wasm_bindgen]
pub fn test_ingredients(text: Option<String>, reference_json: &str) -> Result<String, JsValue> {
    let reference = parse_list(reference_json)?;
    to_json(&crate::test(text_or_empty(&text), &reference))
}

/// Shared and unique items across profiles.
///
/// # Arguments
/// * `profiles_json` - JSON array of `[name, [items...]]` pairs, in order
///
/// # Returns
/// JSON partition with `shared` and `unique` fields
#[wasm_bindgen]
pub fn compare_profiles(profiles_json: &str) -> Result<String, JsValue> {
    let pairs: Vec<(String, Vec<String>)> = serde_json::from_str(profiles_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;
    let profiles: ReferenceLists = pairs.into_iter().collect();
    to_json(&crate::partition(&profiles))
}
