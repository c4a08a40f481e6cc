//! Ingredient lists from diet plan documents.
//!
//! Diet plans arrive as already extracted text or JSON. The ingredient
//! list they yield goes through [`crate::analyze`] (containment), not
//! through the exact scan.

use crate::error::{MatchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LINE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n,]+").unwrap());

/// Keys checked, in order, for the ingredient array.
const INGREDIENT_KEYS: [&str; 3] = ["ingredients", "foods", "items"];

/// Ingredient list from a diet plan text file: one item per line or
/// comma-separated, lower-cased, empty lines dropped.
pub fn diet_ingredients_from_text(text: &str) -> Vec<String> {
    LINE_SEPARATORS
        .split(&text.to_lowercase())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Ingredient list from a diet plan JSON document.
///
/// Looks at `ingredients`, then `diet.ingredients`, then `foods`, then
/// `items`, and finally the first key, in document order, holding a
/// non-empty array whose first element is a string. Non-string elements are skipped. Items are
/// lower-cased.
///
/// # Errors
/// [`MatchError::Json`] for malformed JSON, [`MatchError::NoIngredients`]
/// when no ingredient array is found or it is empty.
pub fn diet_ingredients_from_json(json: &str) -> Result<Vec<String>> {
    let document: Value = serde_json::from_str(json)?;
    let array = find_ingredient_array(&document).ok_or(MatchError::NoIngredients)?;

    let ingredients: Vec<String> = array
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_lowercase)
        .collect();

    if ingredients.is_empty() {
        return Err(MatchError::NoIngredients);
    }
    Ok(ingredients)
}

fn find_ingredient_array(document: &Value) -> Option<&Vec<Value>> {
    let object = document.as_object()?;

    if let Some(array) = object.get("ingredients").and_then(Value::as_array) {
        return Some(array);
    }
    if let Some(array) = object
        .get("diet")
        .and_then(|diet| diet.get("ingredients"))
        .and_then(Value::as_array)
    {
        return Some(array);
    }
    for key in &INGREDIENT_KEYS[1..] {
        if let Some(array) = object.get(*key).and_then(Value::as_array) {
            return Some(array);
        }
    }

    object.values().filter_map(Value::as_array).find(|array| {
        array.first().is_some_and(Value::is_string)
    })
}
