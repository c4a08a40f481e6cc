//! Scanning one token list against every profile at once.

use crate::compare::ReferenceLists;
use crate::matcher::{scan_with, ScanOptions, ScanReport};
use serde::{Deserialize, Serialize};

/// Scan result for a single profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileScan {
    /// Profile name
    pub profile: String,
    /// Scan of the tokens against this profile's items
    pub report: ScanReport,
}

/// Scan `tokens` against each profile, returning reports in profile order.
///
/// # Example
/// ```
/// use mydna_matching::{batch::scan_profiles, ReferenceLists, ScanOptions};
///
/// let profiles: ReferenceLists = [("Rex", vec!["corn"]), ("Max", vec!["soy"])]
///     .into_iter()
///     .collect();
///
/// let scans = scan_profiles(&["corn", "rice"], &profiles, &ScanOptions::default());
/// assert_eq!(scans[0].report.total_matched, 1);
/// assert_eq!(scans[1].report.total_matched, 0);
/// ```
pub fn scan_profiles<T>(
    tokens: &[T],
    profiles: &ReferenceLists,
    options: &ScanOptions,
) -> Vec<ProfileScan>
where
    T: AsRef<str> + Sync,
{
    let lists: Vec<(&str, &[String])> = profiles.iter().collect();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        lists
            .par_iter()
            .map(|(name, items)| scan_single(tokens, name, items, options))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        lists
            .iter()
            .map(|(name, items)| scan_single(tokens, name, items, options))
            .collect()
    }
}

/// Profiles whose scan matched at least one token.
pub fn flagged_profiles(scans: &[ProfileScan]) -> Vec<&str> {
    scans
        .iter()
        .filter(|scan| scan.report.has_matches())
        .map(|scan| scan.profile.as_str())
        .collect()
}

fn scan_single<T: AsRef<str>>(
    tokens: &[T],
    name: &str,
    items: &[String],
    options: &ScanOptions,
) -> ProfileScan {
    ProfileScan {
        profile: name.to_string(),
        report: scan_with(tokens, items, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_profiles_keeps_order() {
        let profiles: ReferenceLists = [
            ("Rex", vec!["corn", "wheat"]),
            ("Max", vec!["soy"]),
            ("Bella", vec!["Wheat"]),
        ]
        .into_iter()
        .collect();

        let scans = scan_profiles(&["wheat", "salt"], &profiles, &ScanOptions::default());
        let names: Vec<_> = scans.iter().map(|s| s.profile.as_str()).collect();
        assert_eq!(names, vec!["Rex", "Max", "Bella"]);
        assert_eq!(flagged_profiles(&scans), vec!["Rex", "Bella"]);
    }

    #[test]
    fn test_scan_profiles_empty() {
        let scans = scan_profiles(&["wheat"], &ReferenceLists::new(), &ScanOptions::default());
        assert!(scans.is_empty());
    }
}
