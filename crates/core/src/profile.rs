//! Intolerance profiles and their ingestion boundary
//!
//! Uploaded data arrives as loosely shaped JSON. It is validated here,
//! once, into typed [`IntoleranceItem`]s; the matching crate only ever
//! sees the flattened item names.
//!
//! # Example
//!
//! ```rust
//! use mydna_core::profile::{Level, Profile, IntoleranceItem};
//!
//! let mut profile = Profile::new("Rex");
//! profile.add(IntoleranceItem::new("Corn", "Grain", Level::Severe).unwrap()).unwrap();
//! assert!(profile.add(IntoleranceItem::new("corn", "Grain", Level::Mild).unwrap()).is_err());
//! assert_eq!(profile.item_names(), vec!["Corn"]);
//! ```

use crate::error::{Error, ErrorCode, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Intolerance severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Level {
    Mild = 1,
    Moderate = 2,
    Severe = 3,
}

impl Level {
    /// Numeric level, 1 to 3
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Mild => "mild",
            Level::Moderate => "moderate",
            Level::Severe => "severe",
        }
    }
}

impl TryFrom<i64> for Level {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Level::Mild),
            2 => Ok(Level::Moderate),
            3 => Ok(Level::Severe),
            other => Err(Error::invalid_level(other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.value())
    }
}

/// A food item the profile owner is intolerant to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntoleranceItem {
    /// Food name, case preserved as entered
    pub item: String,
    /// Free-form tag, e.g. "Protein"
    pub category: String,
    pub level: Level,
}

impl IntoleranceItem {
    /// Create an item; name and category must be non-blank
    pub fn new(item: impl Into<String>, category: impl Into<String>, level: Level) -> Result<Self> {
        let item = item.into().trim().to_string();
        let category = category.into().trim().to_string();

        if item.is_empty() {
            return Err(Error::validation("Intolerance item name cannot be empty"));
        }
        if category.is_empty() {
            return Err(Error::validation(format!("Category missing for item: {}", item)));
        }

        Ok(Self { item, category, level })
    }

    /// Validate one loosely shaped JSON entry
    pub fn from_value(value: &Value) -> Result<Self> {
        let field = |name: &str| value.get(name).and_then(Value::as_str).unwrap_or_default();
        let level = value
            .get("level")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::validation("Intolerance level missing or not a number"))?;

        IntoleranceItem::new(field("item"), field("category"), Level::try_from(level)?)
    }
}

/// Outcome of ingesting uploaded items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Items kept
    pub accepted: usize,
    /// Malformed entries dropped
    pub rejected: usize,
    /// Entries dropped as case-insensitive duplicates
    pub duplicates: usize,
}

impl ImportReport {
    fn absorb(&mut self, other: &ImportReport) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.duplicates += other.duplicates;
    }
}

/// A named list of intolerance items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub name: String,
    intolerances: Vec<IntoleranceItem>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intolerances: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
            merged_from: None,
        }
    }

    /// Items in insertion order
    pub fn items(&self) -> &[IntoleranceItem] {
        &self.intolerances
    }

    /// Returns true if an item with this name exists, ignoring case
    pub fn contains(&self, item: &str) -> bool {
        let lower = item.to_lowercase();
        self.intolerances
            .iter()
            .any(|existing| existing.item.to_lowercase() == lower)
    }

    /// Append an item, rejecting case-insensitive duplicates
    pub fn add(&mut self, item: IntoleranceItem) -> Result<()> {
        if self.contains(&item.item) {
            return Err(Error::duplicate_item(&item.item));
        }
        self.intolerances.push(item);
        self.touch();
        Ok(())
    }

    /// Remove an item by name, ignoring case
    pub fn remove(&mut self, item: &str) -> bool {
        let lower = item.to_lowercase();
        let before = self.intolerances.len();
        self.intolerances
            .retain(|existing| existing.item.to_lowercase() != lower);
        let removed = self.intolerances.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Flattened item names as handed to the matcher
    pub fn item_names(&self) -> Vec<String> {
        self.intolerances.iter().map(|i| i.item.clone()).collect()
    }

    /// Item names with their numeric level
    pub fn leveled_items(&self) -> Vec<(String, u8)> {
        self.intolerances
            .iter()
            .map(|i| (i.item.clone(), i.level.value()))
            .collect()
    }

    /// Build a profile from entries of an upload, dropping malformed ones
    pub fn from_values(name: impl Into<String>, values: &[Value]) -> (Self, ImportReport) {
        let mut profile = Profile::new(name);
        let mut report = ImportReport::default();

        for value in values {
            match IntoleranceItem::from_value(value) {
                Ok(item) => match profile.add(item) {
                    Ok(()) => report.accepted += 1,
                    Err(_) => report.duplicates += 1,
                },
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping intolerance entry");
                    report.rejected += 1;
                }
            }
        }

        profile.updated_at = None;
        (profile, report)
    }

    /// Parse the single-profile upload format `{"intolerances": [...]}`
    ///
    /// Fails if `intolerances` is missing or not an array, or if no entry
    /// is valid.
    pub fn from_import_json(name: impl Into<String>, json: &str) -> Result<(Self, ImportReport)> {
        let document: Value = serde_json::from_str(json)?;
        let values = intolerance_array(&document)?;
        let (profile, report) = Profile::from_values(name, values);

        if report.accepted == 0 {
            return Err(Error::new(
                ErrorCode::NoValidItems,
                "No valid intolerance items found",
            )
            .with_suggestion("Each entry needs item, category and a level of 1, 2 or 3"));
        }
        Ok((profile, report))
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn intolerance_array(document: &Value) -> Result<&Vec<Value>> {
    document
        .get("intolerances")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::invalid_format("Expected an \"intolerances\" array")
                .with_suggestion(r#"Use {"intolerances": [{"item": "Corn", "category": "Grain", "level": 3}]}"#)
        })
}

/// How a profile matched a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    /// The profile name contains the query
    Name { name: String },
    /// One of the items contains the query
    Item { name: String, item: String },
}

impl SearchHit {
    pub fn name(&self) -> &str {
        match self {
            SearchHit::Name { name } | SearchHit::Item { name, .. } => name,
        }
    }
}

/// Summary counts over a profile book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub total_profiles: usize,
    pub total_intolerances: usize,
    pub average_per_profile: usize,
    pub profiles_with_intolerances: usize,
}

/// Ordered collection of uniquely named profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileBook {
    profiles: Vec<Profile>,
}

#[derive(Deserialize)]
struct RawBook {
    #[serde(default)]
    profiles: Vec<RawProfile>,
}

#[derive(Deserialize)]
struct RawProfile {
    name: String,
    #[serde(default)]
    intolerances: Vec<Value>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    merged_from: Option<String>,
}

impl ProfileBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the book format `{"profiles": [{"name": .., "intolerances": [..]}]}`
    ///
    /// Malformed items are dropped and counted; duplicate or blank
    /// profile names are errors.
    pub fn from_json(json: &str) -> Result<(Self, ImportReport)> {
        let raw: RawBook = serde_json::from_str(json)?;
        let mut book = ProfileBook::new();
        let mut report = ImportReport::default();

        for raw_profile in raw.profiles {
            let (mut profile, profile_report) =
                Profile::from_values(raw_profile.name.trim(), &raw_profile.intolerances);
            if let Some(created_at) = raw_profile.created_at {
                profile.created_at = created_at;
            }
            profile.updated_at = raw_profile.updated_at;
            profile.merged_from = raw_profile.merged_from;

            report.absorb(&profile_report);
            book.insert(profile)?;
        }

        Ok((book, report))
    }

    /// Read a book from disk
    pub fn load(path: &Path) -> Result<(Self, ImportReport)> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        ProfileBook::from_json(&content)
            .map_err(|e| e.with_context(format!("Reading profiles from {}", path.display())))
    }

    /// Write the book to disk as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), profiles = self.len(), "Saved profiles");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }

    /// Profile by name, or an `UnknownProfile` error
    pub fn require(&self, name: &str) -> Result<&Profile> {
        self.get(name).ok_or_else(|| Error::unknown_profile(name))
    }

    /// Add a new profile; names must be unique and non-blank
    pub fn insert(&mut self, profile: Profile) -> Result<()> {
        if profile.name.trim().is_empty() {
            return Err(Error::validation("Profile name cannot be empty"));
        }
        if self.get(&profile.name).is_some() {
            return Err(Error::profile_exists(&profile.name));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Add or replace a profile, keeping its position when replacing
    pub fn upsert(&mut self, profile: Profile) -> Result<()> {
        match self.get_mut(&profile.name) {
            Some(slot) => {
                *slot = profile;
                slot.touch();
                Ok(())
            }
            None => self.insert(profile),
        }
    }

    pub fn remove(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::unknown_profile(name))?;
        Ok(self.profiles.remove(index))
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(Error::validation("Profile name cannot be empty"));
        }
        if old == new {
            return Err(Error::validation("New name is the same as the old name"));
        }
        if self.get(new).is_some() {
            return Err(Error::profile_exists(new));
        }
        let profile = self.get_mut(old).ok_or_else(|| Error::unknown_profile(old))?;
        profile.name = new.to_string();
        profile.touch();
        Ok(())
    }

    /// Copy a profile under a new name
    pub fn duplicate(&mut self, name: &str, new_name: &str) -> Result<()> {
        let mut copy = self.require(name)?.clone();
        copy.name = new_name.trim().to_string();
        copy.created_at = Utc::now();
        copy.updated_at = None;
        copy.merged_from = None;
        self.insert(copy)
    }

    /// Move the items of `source` into `target` and drop `source`
    ///
    /// Items already in the target (ignoring case) are skipped. Returns the
    /// number of items added.
    pub fn merge(&mut self, source: &str, target: &str) -> Result<usize> {
        if source == target {
            return Err(Error::new(
                ErrorCode::InvalidMerge,
                "Cannot merge a profile with itself",
            ));
        }
        self.require(target)?;
        let source_profile = self.remove(source)?;

        let Some(target_profile) = self.get_mut(target) else {
            return Err(Error::unknown_profile(target));
        };
        let mut added = 0;
        for item in source_profile.intolerances {
            if target_profile.add(item).is_ok() {
                added += 1;
            }
        }
        target_profile.merged_from = Some(source_profile.name);
        target_profile.touch();

        tracing::info!(source, target, added, "Merged profiles");
        Ok(added)
    }

    /// Profiles whose name or items contain `query`, ignoring case
    ///
    /// Name hits come before item hits; each profile appears once. An empty
    /// query lists every profile as a name hit.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let term = query.trim().to_lowercase();
        let mut name_hits = Vec::new();
        let mut item_hits = Vec::new();

        for profile in &self.profiles {
            if profile.name.to_lowercase().contains(&term) {
                name_hits.push(SearchHit::Name {
                    name: profile.name.clone(),
                });
            } else if let Some(item) = profile
                .intolerances
                .iter()
                .find(|i| i.item.to_lowercase().contains(&term))
            {
                item_hits.push(SearchHit::Item {
                    name: profile.name.clone(),
                    item: item.item.clone(),
                });
            }
        }

        name_hits.extend(item_hits);
        name_hits
    }

    pub fn stats(&self) -> ProfileStats {
        let total_profiles = self.profiles.len();
        let total_intolerances: usize = self.profiles.iter().map(|p| p.intolerances.len()).sum();
        let average_per_profile = if total_profiles > 0 {
            (total_intolerances as f64 / total_profiles as f64).round() as usize
        } else {
            0
        };

        ProfileStats {
            total_profiles,
            total_intolerances,
            average_per_profile,
            profiles_with_intolerances: self
                .profiles
                .iter()
                .filter(|p| !p.intolerances.is_empty())
                .count(),
        }
    }

    /// Integrity problems, without repairing anything
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (index, profile) in self.profiles.iter().enumerate() {
            if profile.name.trim().is_empty() {
                issues.push(format!("Profile #{} has an empty name", index + 1));
            }
            if self.profiles[..index].iter().any(|p| p.name == profile.name) {
                issues.push(format!("Duplicate profile name: \"{}\"", profile.name));
            }
            let mut seen = std::collections::HashSet::new();
            for item in &profile.intolerances {
                if !seen.insert(item.item.to_lowercase()) {
                    issues.push(format!(
                        "Profile \"{}\" lists \"{}\" more than once",
                        profile.name, item.item
                    ));
                }
            }
        }

        issues
    }

    /// `(name, item names)` pairs in book order, for the matcher
    pub fn reference_lists(&self) -> Vec<(String, Vec<String>)> {
        self.profiles
            .iter()
            .map(|p| (p.name.clone(), p.item_names()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, level: Level) -> IntoleranceItem {
        IntoleranceItem::new(name, "Food", level).unwrap()
    }

    fn book() -> ProfileBook {
        let mut book = ProfileBook::new();
        let mut rex = Profile::new("Rex");
        rex.add(item("Corn", Level::Severe)).unwrap();
        rex.add(item("Soy", Level::Mild)).unwrap();
        let mut max = Profile::new("Max");
        max.add(item("soy", Level::Moderate)).unwrap();
        max.add(item("Rice", Level::Mild)).unwrap();
        book.insert(rex).unwrap();
        book.insert(max).unwrap();
        book
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(Level::try_from(3).unwrap(), Level::Severe);
        let err = Level::try_from(4).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLevel);
        assert_eq!(Level::Moderate.to_string(), "Level 2");
    }

    #[test]
    fn test_level_serde() {
        assert_eq!(serde_json::to_string(&Level::Mild).unwrap(), "1");
        assert!(serde_json::from_str::<Level>("0").is_err());
        assert_eq!(serde_json::from_str::<Level>("2").unwrap(), Level::Moderate);
    }

    #[test]
    fn test_item_requires_fields() {
        assert!(IntoleranceItem::new("  ", "Grain", Level::Mild).is_err());
        assert!(IntoleranceItem::new("Corn", "", Level::Mild).is_err());
    }

    #[test]
    fn test_profile_rejects_duplicates() {
        let mut profile = Profile::new("Rex");
        profile.add(item("Corn", Level::Severe)).unwrap();
        let err = profile.add(item("CORN", Level::Mild)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateItem);
        assert_eq!(profile.items().len(), 1);
    }

    #[test]
    fn test_profile_remove() {
        let mut profile = Profile::new("Rex");
        profile.add(item("Corn", Level::Severe)).unwrap();
        assert!(profile.remove("corn"));
        assert!(!profile.remove("corn"));
    }

    #[test]
    fn test_import_drops_invalid_entries() {
        let json = r#"{"intolerances": [
            {"item": "Corn", "category": "Grain", "level": 3},
            {"item": "Soy", "category": "Legume", "level": 5},
            {"item": "", "category": "Legume", "level": 1},
            {"category": "Dairy", "level": 2},
            {"item": "corn", "category": "Grain", "level": 1}
        ]}"#;

        let (profile, report) = Profile::from_import_json("My Profile", json).unwrap();
        assert_eq!(profile.item_names(), vec!["Corn"]);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.rejected, 3);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_import_requires_array() {
        let err = Profile::from_import_json("P", r#"{"items": []}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_import_no_valid_items() {
        let json = r#"{"intolerances": [{"item": "Soy", "level": 2}]}"#;
        let err = Profile::from_import_json("P", json).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoValidItems);
    }

    #[test]
    fn test_book_round_trip_keeps_order() {
        let original = book();
        let json = serde_json::to_string(&original).unwrap();
        let (parsed, report) = ProfileBook::from_json(&json).unwrap();
        assert_eq!(parsed.names(), vec!["Rex", "Max"]);
        assert_eq!(report.accepted, 4);
        assert_eq!(parsed.get("Rex").unwrap().leveled_items()[0], ("Corn".to_string(), 3));
    }

    #[test]
    fn test_book_rejects_duplicate_names() {
        let json = r#"{"profiles": [{"name": "Rex"}, {"name": "Rex"}]}"#;
        let err = ProfileBook::from_json(json).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProfileExists);
    }

    #[test]
    fn test_book_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        book().save(&path).unwrap();

        let (loaded, _) = ProfileBook::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("Max").unwrap().item_names(), vec!["soy", "Rice"]);
    }

    #[test]
    fn test_book_load_missing_file() {
        let err = ProfileBook::load(Path::new("/nonexistent/profiles.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_merge_skips_existing_items() {
        let mut book = book();
        let added = book.merge("Max", "Rex").unwrap();
        assert_eq!(added, 1);
        assert!(book.get("Max").is_none());
        let rex = book.get("Rex").unwrap();
        assert_eq!(rex.item_names(), vec!["Corn", "Soy", "Rice"]);
        assert_eq!(rex.merged_from.as_deref(), Some("Max"));
    }

    #[test]
    fn test_merge_errors() {
        let mut book = book();
        assert_eq!(book.merge("Rex", "Rex").unwrap_err().code, ErrorCode::InvalidMerge);
        assert_eq!(book.merge("Rex", "Nope").unwrap_err().code, ErrorCode::UnknownProfile);
        assert_eq!(book.merge("Nope", "Rex").unwrap_err().code, ErrorCode::UnknownProfile);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_rename_and_duplicate() {
        let mut book = book();
        book.rename("Rex", "Rexy").unwrap();
        assert_eq!(book.names(), vec!["Rexy", "Max"]);
        assert_eq!(book.rename("Rexy", "Max").unwrap_err().code, ErrorCode::ProfileExists);

        book.duplicate("Max", "Max Copy").unwrap();
        assert_eq!(book.get("Max Copy").unwrap().item_names(), vec!["soy", "Rice"]);
        assert_eq!(book.duplicate("Ghost", "X").unwrap_err().code, ErrorCode::UnknownProfile);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut book = book();
        let mut rex = Profile::new("Rex");
        rex.add(item("Lamb", Level::Mild)).unwrap();
        book.upsert(rex).unwrap();
        assert_eq!(book.names(), vec!["Rex", "Max"]);
        assert_eq!(book.get("Rex").unwrap().item_names(), vec!["Lamb"]);
    }

    #[test]
    fn test_search_orders_name_hits_first() {
        let mut book = book();
        book.insert(Profile::new("Rice Lover")).unwrap();
        let hits = book.search("rice");
        let names: Vec<_> = hits.iter().map(SearchHit::name).collect();
        assert_eq!(names, vec!["Rice Lover", "Max"]);
        assert!(matches!(&hits[1], SearchHit::Item { item, .. } if item == "Rice"));
        assert_eq!(book.search("  ").len(), 3);
    }

    #[test]
    fn test_stats() {
        let mut book = book();
        book.insert(Profile::new("Empty")).unwrap();
        let stats = book.stats();
        assert_eq!(stats.total_profiles, 3);
        assert_eq!(stats.total_intolerances, 4);
        assert_eq!(stats.average_per_profile, 1);
        assert_eq!(stats.profiles_with_intolerances, 2);
    }

    #[test]
    fn test_validate_clean_book() {
        assert!(book().validate().is_empty());
    }

    #[test]
    fn test_reference_lists_in_order() {
        let lists = book().reference_lists();
        assert_eq!(lists[0].0, "Rex");
        assert_eq!(lists[1].1, vec!["soy", "Rice"]);
    }

    proptest::proptest! {
        #[test]
        fn prop_profile_never_holds_case_duplicates(names in proptest::collection::vec("[a-zA-Z]{1,4}", 0..20)) {
            let mut profile = Profile::new("P");
            for name in &names {
                let _ = profile.add(item(name, Level::Mild));
            }
            let mut lowered: Vec<String> = profile.item_names().iter().map(|n| n.to_lowercase()).collect();
            let len = lowered.len();
            lowered.sort();
            lowered.dedup();
            proptest::prop_assert_eq!(lowered.len(), len);
        }
    }
}
