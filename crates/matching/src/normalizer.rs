//! Text normalization for OCR output and extracted document text.
//!
//! Two independent paths live here:
//! - [`clean`] + [`tokenize`]: aggressive character-level scrubbing for dense
//!   OCR blobs, producing candidate ingredient tokens.
//! - [`extract_candidates`]: pattern-based word extraction for loosely
//!   formatted document text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Words never treated as ingredients.
pub const STOP_WORDS: [&str; 12] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r\t]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s.,()&\-]").unwrap());
static SINGLE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]\b").unwrap());
static COMMA_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r",+").unwrap());
static EDGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[,.\s]+|[,.\s]+$").unwrap());

static TOKEN_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,.\n\r;:()\[\]]+").unwrap());
static INGREDIENT_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n,;:()\[\]]+").unwrap());
static LETTERS_AND_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z\s]+$").unwrap());

static CANDIDATE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        // Capitalized words
        Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*").unwrap(),
        // Lowercase words
        Regex::new(r"[a-z]+(?:\s+[a-z]+)*").unwrap(),
        // ALL CAPS words
        Regex::new(r"[A-Z]+(?:\s+[A-Z]+)*").unwrap(),
    ]
});

/// One step of the cleaning pipeline.
///
/// Steps run in the order of [`CLEAN_PIPELINE`]; later steps assume the
/// earlier ones already ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanStep {
    /// Lower-case the whole text
    Lowercase,
    /// Newline, carriage return and tab runs become `", "`
    LineBreaksToCommas,
    /// Whitespace runs become a single space
    CollapseWhitespace,
    /// Drop everything except word chars, whitespace and `.,()&-`
    StripDisallowed,
    /// Drop isolated single letters (usually misread punctuation)
    DropSingleLetters,
    /// Comma runs become a single comma
    CollapseCommas,
    /// Strip leading and trailing commas, periods and whitespace
    TrimEdges,
    /// Trim surrounding whitespace
    FinalTrim,
}

/// The cleaning pipeline, in application order.
pub const CLEAN_PIPELINE: [CleanStep; 8] = [
    CleanStep::Lowercase,
    CleanStep::LineBreaksToCommas,
    CleanStep::CollapseWhitespace,
    CleanStep::StripDisallowed,
    CleanStep::DropSingleLetters,
    CleanStep::CollapseCommas,
    CleanStep::TrimEdges,
    CleanStep::FinalTrim,
];

impl CleanStep {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CleanStep::Lowercase => "lowercase",
            CleanStep::LineBreaksToCommas => "line_breaks_to_commas",
            CleanStep::CollapseWhitespace => "collapse_whitespace",
            CleanStep::StripDisallowed => "strip_disallowed",
            CleanStep::DropSingleLetters => "drop_single_letters",
            CleanStep::CollapseCommas => "collapse_commas",
            CleanStep::TrimEdges => "trim_edges",
            CleanStep::FinalTrim => "final_trim",
        }
    }

    /// Apply this step on its own.
    pub fn apply(&self, text: &str) -> String {
        match self {
            CleanStep::Lowercase => text.to_lowercase(),
            CleanStep::LineBreaksToCommas => LINE_BREAKS.replace_all(text, ", ").into_owned(),
            CleanStep::CollapseWhitespace => WHITESPACE.replace_all(text, " ").into_owned(),
            CleanStep::StripDisallowed => DISALLOWED.replace_all(text, "").into_owned(),
            CleanStep::DropSingleLetters => SINGLE_LETTER.replace_all(text, "").into_owned(),
            CleanStep::CollapseCommas => COMMA_RUNS.replace_all(text, ",").into_owned(),
            CleanStep::TrimEdges => EDGES.replace_all(text, "").into_owned(),
            CleanStep::FinalTrim => text.trim().to_string(),
        }
    }
}

/// Tunables for tokenizing and candidate extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    /// Tokens with fewer chars than this are dropped
    pub min_token_len: usize,
    /// Candidate spans must be strictly longer than this
    pub candidate_min_len: usize,
    /// Candidate spans must be strictly shorter than this
    pub candidate_max_len: usize,
    /// Words never reported as candidates (compared case-insensitively)
    pub stop_words: Vec<String>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            candidate_min_len: 2,
            candidate_max_len: 50,
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl NormalizerOptions {
    fn is_stop_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.stop_words.iter().any(|w| w.eq_ignore_ascii_case(&lower))
    }
}

/// Run the full cleaning pipeline over raw OCR text.
///
/// The result never has leading/trailing commas, periods or spaces, comma
/// runs, or isolated single letters. Empty input gives an empty string.
///
/// # Example
/// ```
/// use mydna_matching::clean;
///
/// assert_eq!(
///     clean("WHEAT\n\nCORN syrup, (SOY) lecithin!!"),
///     "wheat, corn syrup, (soy) lecithin"
/// );
/// ```
pub fn clean(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    CLEAN_PIPELINE
        .iter()
        .fold(raw.to_string(), |text, step| step.apply(&text))
}

/// Split cleaned text into candidate tokens using default options.
pub fn tokenize(cleaned: &str) -> Vec<String> {
    tokenize_with(cleaned, &NormalizerOptions::default())
}

/// Split cleaned text into candidate tokens.
///
/// Pieces are separated by runs of `, . \n \r ; : ( ) [ ]`. Each piece is
/// trimmed with inner whitespace collapsed, then pieces shorter than
/// `min_token_len` and pieces that are not purely lower-case letters and
/// spaces are dropped.
pub fn tokenize_with(cleaned: &str, options: &NormalizerOptions) -> Vec<String> {
    let tokens: Vec<String> = TOKEN_SEPARATORS
        .split(cleaned)
        .map(|piece| WHITESPACE.replace_all(piece.trim(), " ").into_owned())
        .filter(|piece| piece.chars().count() >= options.min_token_len)
        .filter(|piece| LETTERS_AND_SPACES.is_match(piece))
        .collect();

    tracing::trace!(tokens = tokens.len(), "Tokenized text");
    tokens
}

/// Clean and tokenize in one go.
pub fn normalize(raw: &str) -> Vec<String> {
    tokenize(&clean(raw))
}

/// Quick ingredient parse of a raw label: lower-case, split on list
/// separators, keep letter-only pieces longer than two chars, drop stop
/// words.
///
/// Unlike [`tokenize`] this does not split on periods and does not clean
/// the text first.
pub fn parse_ingredients(raw: &str) -> Vec<String> {
    parse_ingredients_with(raw, &NormalizerOptions::default())
}

/// [`parse_ingredients`] with custom length and stop-word settings.
pub fn parse_ingredients_with(raw: &str, options: &NormalizerOptions) -> Vec<String> {
    let lower = raw.to_lowercase();

    INGREDIENT_SEPARATORS
        .split(&lower)
        .map(str::trim)
        .filter(|item| item.chars().count() >= options.min_token_len)
        .filter(|item| LETTERS_AND_SPACES.is_match(item))
        .filter(|item| !options.is_stop_word(item))
        .map(String::from)
        .collect()
}

/// Extract loosely formatted ingredient names from document text using
/// default options.
pub fn extract_candidates(text: &str) -> BTreeSet<String> {
    extract_candidates_with(text, &NormalizerOptions::default())
}

/// Extract loosely formatted ingredient names from document text.
///
/// Runs capitalized, lower-case and ALL-CAPS word-run scans over the raw
/// text and unions the surviving spans.
pub fn extract_candidates_with(text: &str, options: &NormalizerOptions) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    for pattern in CANDIDATE_PATTERNS.iter() {
        for found in pattern.find_iter(text) {
            let span = found.as_str().trim();
            let len = span.chars().count();
            if len <= options.candidate_min_len || len >= options.candidate_max_len {
                continue;
            }
            if options.is_stop_word(span) {
                continue;
            }
            candidates.insert(span.to_string());
        }
    }

    tracing::trace!(candidates = candidates.len(), "Extracted candidates");
    candidates
}
