//! Plain-text rendering of match reports
//!
//! Renderers return strings without colour codes; callers decide how to
//! print them.

use crate::output::format_count;
use mydna_core::profile::{ImportReport, ProfileStats, SearchHit};
use mydna_matching::batch::ProfileScan;
use mydna_matching::{Partition, ScanReport, TestReport};
use std::fmt::Write;

/// Message shown when a scan recorded fewer tokens than it considered
pub fn overflow_message(report: &ScanReport) -> Option<String> {
    report.overflowed.then(|| {
        format!(
            "Showing first {} results ({} total found)",
            report.shown(),
            report.total_considered
        )
    })
}

/// Render an exact scan: matched tokens with their level, then the rest
pub fn render_scan(report: &ScanReport) -> String {
    let mut out = String::new();

    if report.has_matches() {
        let _ = writeln!(
            out,
            "Found {} ({} scanned)",
            format_count(report.total_matched, "intolerance", "intolerances"),
            report.total_considered
        );
        for entry in report.entries.iter().filter(|e| e.matched) {
            match entry.level {
                Some(level) => {
                    let _ = writeln!(out, "  - {} (Level {})", entry.token, level);
                }
                None => {
                    let _ = writeln!(out, "  - {}", entry.token);
                }
            }
        }
    } else {
        let _ = writeln!(
            out,
            "No intolerances found ({} scanned)",
            report.total_considered
        );
    }

    if !report.other.is_empty() {
        let _ = writeln!(out, "Other ingredients:");
        for token in &report.other {
            let _ = writeln!(out, "  - {}", token);
        }
    }

    if let Some(message) = overflow_message(report) {
        let _ = writeln!(out, "{}", message);
    }

    out
}

/// Render a containment test
pub fn render_test(report: &TestReport) -> String {
    let mut out = String::new();

    if report.is_clear() {
        let _ = writeln!(
            out,
            "No intolerances found in {}",
            format_count(report.total_considered, "ingredient", "ingredients")
        );
        return out;
    }

    let _ = writeln!(
        out,
        "Flagged {} of {}",
        report.flagged.len(),
        format_count(report.total_considered, "ingredient", "ingredients")
    );
    for m in &report.matches {
        let kind = match m.match_type {
            mydna_matching::MatchType::Exact => "matches",
            mydna_matching::MatchType::Partial => "contains",
        };
        let _ = writeln!(out, "  - {} ({} {})", m.ingredient, kind, m.matched_against);
    }

    out
}

/// Render the shared/unique partition across profiles
pub fn render_partition(partition: &Partition) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Shared by all profiles ({}):", partition.shared.len());
    push_items(&mut out, &partition.shared);

    for (name, unique) in &partition.unique {
        let _ = writeln!(out, "Unique to {} ({}):", name, unique.len());
        push_items(&mut out, unique);
    }

    out
}

/// Render scans of one token list against every profile
pub fn render_profile_scans(scans: &[ProfileScan]) -> String {
    let mut out = String::new();

    for scan in scans {
        let found = &scan.report.found;
        if found.is_empty() {
            let _ = writeln!(out, "{}: clear", scan.profile);
        } else {
            let _ = writeln!(
                out,
                "{}: {} ({})",
                scan.profile,
                format_count(scan.report.total_matched, "match", "matches"),
                found.join(", ")
            );
        }
    }

    out
}

/// Render profile book statistics
pub fn render_stats(stats: &ProfileStats) -> String {
    format!(
        "Profiles: {}\nIntolerances: {}\nAverage per profile: {}\nProfiles with intolerances: {}\n",
        stats.total_profiles,
        stats.total_intolerances,
        stats.average_per_profile,
        stats.profiles_with_intolerances
    )
}

/// Render profile search hits, one per line
pub fn render_search(query: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();

    if hits.is_empty() {
        let _ = writeln!(out, "No profiles match \"{}\"", query);
        return out;
    }

    for hit in hits {
        match hit {
            SearchHit::Name { name } => {
                let _ = writeln!(out, "{}", name);
            }
            SearchHit::Item { name, item } => {
                let _ = writeln!(out, "{} (contains {})", name, item);
            }
        }
    }

    out
}

/// One-line summary of an import
pub fn render_import(name: &str, report: &ImportReport) -> String {
    let mut line = format!(
        "Imported {} into {}",
        format_count(report.accepted, "intolerance", "intolerances"),
        name
    );
    if report.rejected > 0 {
        let _ = write!(line, ", skipped {} invalid", report.rejected);
    }
    if report.duplicates > 0 {
        let _ = write!(line, ", skipped {}", format_count(report.duplicates, "duplicate", "duplicates"));
    }
    line
}

fn push_items(out: &mut String, items: &[String]) {
    if items.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mydna_matching::{partition, scan, scan_with_levels, test, ReferenceLists, ScanOptions};

    #[test]
    fn test_render_scan_shows_levels() {
        let report = scan_with_levels(
            &["Corn", "salt"],
            &[("corn", 3u8)],
            &ScanOptions::default(),
        );
        let text = render_scan(&report);
        assert!(text.starts_with("Found 1 intolerance (2 scanned)"));
        assert!(text.contains("  - Corn (Level 3)"));
        assert!(text.contains("Other ingredients:\n  - salt"));
        assert!(!text.contains("Showing first"));
    }

    #[test]
    fn test_render_scan_overflow() {
        let tokens: Vec<String> = (0..60).map(|i| format!("token{}", i)).collect();
        let report = scan(&tokens, &[] as &[&str]);
        assert_eq!(
            overflow_message(&report).as_deref(),
            Some("Showing first 50 results (60 total found)")
        );
        assert!(render_scan(&report).starts_with("No intolerances found (60 scanned)"));
    }

    #[test]
    fn test_render_test() {
        let report = test("organic corn syrup, corn, salt", &["corn"]);
        let text = render_test(&report);
        assert!(text.starts_with("Flagged 2 of 3 ingredients"));
        assert!(text.contains("  - organic corn syrup (contains corn)"));
        assert!(text.contains("  - corn (matches corn)"));

        let clear = render_test(&test("salt", &["corn"]));
        assert_eq!(clear, "No intolerances found in 1 ingredient\n");
    }

    #[test]
    fn test_render_partition() {
        let profiles: ReferenceLists = [
            ("A", vec!["Corn", "Wheat"]),
            ("B", vec!["Wheat"]),
        ]
        .into_iter()
        .collect();
        let text = render_partition(&partition(&profiles));
        assert_eq!(
            text,
            "Shared by all profiles (1):\n  - Wheat\nUnique to A (1):\n  - Corn\nUnique to B (0):\n  (none)\n"
        );
    }

    #[test]
    fn test_render_search_empty() {
        assert_eq!(render_search("zzz", &[]), "No profiles match \"zzz\"\n");
    }

    #[test]
    fn test_render_import() {
        let report = ImportReport {
            accepted: 2,
            rejected: 1,
            duplicates: 0,
        };
        assert_eq!(
            render_import("Rex", &report),
            "Imported 2 intolerances into Rex, skipped 1 invalid"
        );
    }
}
