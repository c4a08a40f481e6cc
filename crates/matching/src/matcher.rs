//! Matching candidate ingredients against an intolerance list.
//!
//! Two semantics coexist and must not be confused:
//! - [`scan`]: exact, case-insensitive token membership (OCR label scans).
//! - [`test`]: substring containment, reference item inside the candidate
//!   (typed ingredient lists and diet plans).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LIST_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n,]+").unwrap());

/// Maximum number of entries recorded in a scan report.
pub const DEFAULT_DISPLAY_CAP: usize = 50;

/// Tokens shorter than this are skipped by [`scan`].
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Options for exact scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Maximum number of tokens recorded for display
    pub display_cap: usize,
    /// Tokens with fewer chars are not considered at all
    pub min_token_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            display_cap: DEFAULT_DISPLAY_CAP,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

/// Per-token outcome of an exact scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMatch {
    /// Token as supplied
    pub token: String,
    /// Whether the token equals a reference item
    pub matched: bool,
    /// Severity of the matched reference item, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

/// Result of [`scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Matched tokens, in input order (capped)
    pub found: Vec<String>,
    /// Unmatched tokens, in input order (capped)
    pub other: Vec<String>,
    /// Every recorded token with its outcome, in input order (capped)
    pub entries: Vec<TokenMatch>,
    /// Tokens considered over the whole input
    pub total_considered: usize,
    /// Matches over the whole input
    pub total_matched: usize,
    /// True when more tokens were considered than recorded
    pub overflowed: bool,
}

impl ScanReport {
    /// Number of recorded entries.
    pub fn shown(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if any token matched, recorded or not.
    pub fn has_matches(&self) -> bool {
        self.total_matched > 0
    }
}

/// How a containment match was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Piece equals the reference item
    Exact,
    /// Reference item is a proper substring of the piece
    Partial,
}

/// One flagged ingredient from a containment test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentMatch {
    /// The lower-cased ingredient piece
    pub ingredient: String,
    /// First reference item (in reference order) found inside it
    pub matched_against: String,
    /// Exact or partial
    pub match_type: MatchType,
}

/// Result of [`test`] and [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Flagged pieces, in input order
    pub flagged: Vec<String>,
    /// Non-empty pieces considered
    pub total_considered: usize,
    /// Detail for each flagged piece
    pub matches: Vec<ContainmentMatch>,
}

impl TestReport {
    /// Returns true if nothing was flagged.
    pub fn is_clear(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Exact, case-insensitive scan with default options.
///
/// # Example
/// ```
/// use mydna_matching::scan;
///
/// let report = scan(&["Corn", "salt"], &["corn"]);
/// assert_eq!(report.found, vec!["Corn"]);
/// assert_eq!(report.other, vec!["salt"]);
/// ```
pub fn scan<T, R>(tokens: &[T], reference: &[R]) -> ScanReport
where
    T: AsRef<str>,
    R: AsRef<str>,
{
    scan_with(tokens, reference, &ScanOptions::default())
}

/// Exact, case-insensitive scan.
pub fn scan_with<T, R>(tokens: &[T], reference: &[R], options: &ScanOptions) -> ScanReport
where
    T: AsRef<str>,
    R: AsRef<str>,
{
    let levels: HashMap<String, Option<u8>> = reference
        .iter()
        .map(|item| (item.as_ref().to_lowercase(), None))
        .collect();
    scan_lookup(tokens, &levels, options)
}

/// Exact scan against `(item, level)` pairs; matched entries carry the
/// level of the reference item.
///
/// When the same item appears twice, the first occurrence wins.
pub fn scan_with_levels<T, R>(
    tokens: &[T],
    reference: &[(R, u8)],
    options: &ScanOptions,
) -> ScanReport
where
    T: AsRef<str>,
    R: AsRef<str>,
{
    let mut levels: HashMap<String, Option<u8>> = HashMap::with_capacity(reference.len());
    for (item, level) in reference {
        levels
            .entry(item.as_ref().to_lowercase())
            .or_insert(Some(*level));
    }
    scan_lookup(tokens, &levels, options)
}

fn scan_lookup<T: AsRef<str>>(
    tokens: &[T],
    levels: &HashMap<String, Option<u8>>,
    options: &ScanOptions,
) -> ScanReport {
    let mut report = ScanReport::default();

    for token in tokens {
        let token = token.as_ref();
        if token.chars().count() < options.min_token_len {
            continue;
        }

        let hit = levels.get(&token.to_lowercase());
        report.total_considered += 1;
        if hit.is_some() {
            report.total_matched += 1;
        }

        if report.entries.len() >= options.display_cap {
            continue;
        }

        match hit {
            Some(level) => {
                report.found.push(token.to_string());
                report.entries.push(TokenMatch {
                    token: token.to_string(),
                    matched: true,
                    level: *level,
                });
            }
            None => {
                report.other.push(token.to_string());
                report.entries.push(TokenMatch {
                    token: token.to_string(),
                    matched: false,
                    level: None,
                });
            }
        }
    }

    report.overflowed = report.total_considered > options.display_cap;

    tracing::debug!(
        considered = report.total_considered,
        matched = report.total_matched,
        shown = report.shown(),
        overflowed = report.overflowed,
        "Scan completed"
    );

    report
}

/// Containment test over free text.
///
/// The text is split on commas and newlines; a piece is flagged when any
/// reference item is a substring of it. The reverse direction never
/// flags: `test("corn", &["organic corn syrup"])` is clear.
///
/// No minimum reference length applies, so a one-letter reference item
/// flags nearly everything.
///
/// # Example
/// ```
/// use mydna_matching::test;
///
/// let report = test("organic corn syrup, salt", &["corn"]);
/// assert_eq!(report.flagged, vec!["organic corn syrup"]);
/// assert_eq!(report.total_considered, 2);
/// ```
pub fn test<R: AsRef<str>>(free_text: &str, reference: &[R]) -> TestReport {
    let pieces: Vec<&str> = LIST_SEPARATORS.split(free_text).collect();
    analyze(&pieces, reference)
}

/// Containment analysis of an already split ingredient list.
///
/// Pieces are trimmed and lower-cased; empty pieces are ignored.
pub fn analyze<I, R>(ingredients: &[I], reference: &[R]) -> TestReport
where
    I: AsRef<str>,
    R: AsRef<str>,
{
    let reference: Vec<String> = reference
        .iter()
        .map(|item| item.as_ref().to_lowercase())
        .collect();

    let mut report = TestReport::default();

    for ingredient in ingredients {
        let piece = ingredient.as_ref().trim().to_lowercase();
        if piece.is_empty() {
            continue;
        }
        report.total_considered += 1;

        if let Some(item) = reference.iter().find(|item| piece.contains(item.as_str())) {
            let match_type = if piece == *item {
                MatchType::Exact
            } else {
                MatchType::Partial
            };
            report.matches.push(ContainmentMatch {
                ingredient: piece.clone(),
                matched_against: item.clone(),
                match_type,
            });
            report.flagged.push(piece);
        }
    }

    tracing::debug!(
        considered = report.total_considered,
        flagged = report.flagged.len(),
        "Containment test completed"
    );

    report
}
