//! Ingredient matching for MyDNA.
//!
//! This crate provides:
//! - OCR text cleaning and tokenizing
//! - Candidate extraction from document text
//! - Exact scans and containment tests against intolerance lists
//! - Shared/unique partitions across profiles
//!
//! Everything here is a pure function over strings; callers own the
//! profiles and any persistent state.
//!
//! # Example
//!
//! ```
//! use mydna_matching::{normalize, scan};
//!
//! let tokens = normalize("INGREDIENTS\nWheat flour, SOY lecithin, salt");
//! let report = scan(&tokens, &["salt", "Soy Lecithin"]);
//!
//! assert_eq!(report.found, vec!["soy lecithin", "salt"]);
//! ```

mod matcher;
mod normalizer;
mod compare;
pub mod batch;
pub mod diet;
mod error;

#[cfg(feature = "wasm")]
mod wasm;

pub use matcher::{
    analyze, scan, scan_with, scan_with_levels, test, ContainmentMatch, MatchType, ScanOptions,
    ScanReport, TestReport, TokenMatch, DEFAULT_DISPLAY_CAP, DEFAULT_MIN_TOKEN_LEN,
};
pub use normalizer::{
    clean, extract_candidates, extract_candidates_with, normalize, parse_ingredients,
    parse_ingredients_with, tokenize, tokenize_with, CleanStep, NormalizerOptions, CLEAN_PIPELINE,
    STOP_WORDS,
};
pub use compare::{partition, shared_across, unique_for, Partition, ReferenceLists};
pub use error::{MatchError, MatchErrorCode, Result};
