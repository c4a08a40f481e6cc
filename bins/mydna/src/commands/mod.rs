//! Subcommand implementations
//!
//! Each command returns the process exit code on success.

pub mod check;
pub mod profile;
pub mod text;

use crate::{OutputFormat, ProfileArgs};
use mydna_core::config::ConfigSchema;
use mydna_core::profile::ProfileBook;
use mydna_core::{Config, Error};
use mydna_matching::{NormalizerOptions, ScanOptions};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: Config, format: OutputFormat) -> Self {
        Self { config, format }
    }

    fn schema(&self) -> &ConfigSchema {
        &self.config.schema
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn normalizer_options(&self) -> NormalizerOptions {
        let normalizer = &self.schema().normalizer;
        NormalizerOptions {
            min_token_len: normalizer.min_token_len,
            candidate_min_len: normalizer.candidate_min_len,
            candidate_max_len: normalizer.candidate_max_len,
            stop_words: normalizer.stop_words.clone(),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        let scan = &self.schema().scan;
        ScanOptions {
            display_cap: scan.display_cap,
            min_token_len: scan.min_token_len,
        }
    }

    /// Profile book path from the flag, else the configured default
    pub fn profiles_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map_or_else(
            || PathBuf::from(&self.schema().general.profiles_path),
            Path::to_path_buf,
        )
    }

    /// Load the profile book, logging entries dropped on the way in
    pub fn load_book(&self, flag: Option<&Path>) -> mydna_core::Result<ProfileBook> {
        let path = self.profiles_path(flag);
        let (book, report) = ProfileBook::load(&path)?;
        if report.rejected > 0 || report.duplicates > 0 {
            tracing::warn!(
                path = %path.display(),
                rejected = report.rejected,
                duplicates = report.duplicates,
                "Dropped invalid profile entries"
            );
        }
        mydna_telemetry::metrics().increment_by("profiles_loaded", book.len() as u64);
        tracing::debug!(path = %path.display(), profiles = book.len(), "Loaded profile book");
        Ok(book)
    }

    /// Profile name from the flag, else `general.default_profile`
    pub fn profile_name(&self, target: &ProfileArgs) -> Option<String> {
        target
            .profile
            .clone()
            .or_else(|| self.schema().general.default_profile.clone())
    }

    /// Like [`Context::profile_name`], but a profile is required
    pub fn require_profile_name(&self, target: &ProfileArgs) -> mydna_core::Result<String> {
        self.profile_name(target).ok_or_else(|| {
            Error::validation("No profile selected")
                .with_suggestion("Pass --profile or set general.default_profile in .mydna.toml")
        })
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
