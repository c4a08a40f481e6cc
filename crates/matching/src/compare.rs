//! Shared and unique intolerances across profiles.

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered mapping of profile name to intolerance item names.
///
/// Order is significant: [`shared_across`] takes its output casing from
/// the first list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLists {
    lists: Vec<(String, Vec<String>)>,
}

impl ReferenceLists {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a list, replacing an existing list of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, items: Vec<String>) {
        let name = name.into();
        match self.lists.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = items,
            None => self.lists.push((name, items)),
        }
    }

    /// Items of the named list.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, items)| items.as_slice())
    }

    /// Profile names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate `(name, items)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns true if there are no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl<N, I, S> FromIterator<(N, I)> for ReferenceLists
where
    N: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut lists = ReferenceLists::new();
        for (name, items) in iter {
            lists.insert(name, items.into_iter().map(Into::into).collect());
        }
        lists
    }
}

/// Shared items plus every profile's unique remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Items common to all profiles, cased as in the first profile
    pub shared: Vec<String>,
    /// Per profile, its items minus the shared ones
    pub unique: Vec<(String, Vec<String>)>,
}

fn lowered(items: &[String]) -> HashSet<String> {
    items.iter().map(|item| item.to_lowercase()).collect()
}

/// Keeps the first spelling of each item, compared case-insensitively.
fn dedup_keep(items: &[String], mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| {
            let lower = item.to_lowercase();
            keep(&lower) && seen.insert(lower)
        })
        .cloned()
        .collect()
}

/// Items present in every profile.
///
/// Comparison is case-insensitive; casing and order come from the first
/// profile. No profiles gives an empty result.
///
/// # Example
/// ```
/// use mydna_matching::{shared_across, ReferenceLists};
///
/// let profiles: ReferenceLists = [
///     ("A", vec!["Corn", "Soy", "Wheat"]),
///     ("B", vec!["Soy", "Wheat", "Rice"]),
///     ("C", vec!["Wheat", "Rice"]),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(shared_across(&profiles), vec!["Wheat"]);
/// ```
pub fn shared_across(profiles: &ReferenceLists) -> Vec<String> {
    let mut lists = profiles.iter();
    let Some((_, first)) = lists.next() else {
        return Vec::new();
    };

    let others: Vec<HashSet<String>> = lists.map(|(_, items)| lowered(items)).collect();
    dedup_keep(first, |lower| others.iter().all(|set| set.contains(lower)))
}

/// Items of the named profile that are not shared by all profiles.
///
/// Casing and order follow the named profile.
///
/// # Errors
/// [`MatchError::UnknownProfile`] if `name` is not in `profiles`.
pub fn unique_for(name: &str, profiles: &ReferenceLists) -> Result<Vec<String>> {
    let items = profiles
        .get(name)
        .ok_or_else(|| MatchError::UnknownProfile(name.to_string()))?;
    let shared = lowered(&shared_across(profiles));
    Ok(dedup_keep(items, |lower| !shared.contains(lower)))
}

/// Shared items and each profile's unique items in one pass.
pub fn partition(profiles: &ReferenceLists) -> Partition {
    let shared = shared_across(profiles);
    let shared_lower = lowered(&shared);

    let unique = profiles
        .iter()
        .map(|(name, items)| {
            let rest = dedup_keep(items, |lower| !shared_lower.contains(lower));
            (name.to_string(), rest)
        })
        .collect();

    tracing::debug!(
        profiles = profiles.len(),
        shared = shared.len(),
        "Partitioned profiles"
    );

    Partition { shared, unique }
}
