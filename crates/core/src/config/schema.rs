//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Profile book used when `--profiles` is not given
    #[serde(default = "default_profiles_path")]
    pub profiles_path: String,

    /// Profile used when `--profile` is not given
    #[serde(default)]
    pub default_profile: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            profiles_path: default_profiles_path(),
            default_profile: None,
        }
    }
}

fn default_profiles_path() -> String {
    "profiles.json".to_string()
}

/// Tokenizer and candidate extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizerConfig {
    /// Tokens with fewer characters are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Extracted candidates must be longer than this (exclusive)
    #[serde(default = "default_candidate_min_len")]
    pub candidate_min_len: usize,

    /// Extracted candidates must be shorter than this (exclusive)
    #[serde(default = "default_candidate_max_len")]
    pub candidate_max_len: usize,

    /// Words never reported as candidates
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            candidate_min_len: default_candidate_min_len(),
            candidate_max_len: default_candidate_max_len(),
            stop_words: default_stop_words(),
        }
    }
}

fn default_min_token_len() -> usize {
    3
}

fn default_candidate_min_len() -> usize {
    2
}

fn default_candidate_max_len() -> usize {
    50
}

fn default_stop_words() -> Vec<String> {
    vec![
        "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Exact scan settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Maximum number of tokens listed in a scan report
    #[serde(default = "default_display_cap")]
    pub display_cap: usize,

    /// Tokens with fewer characters are skipped by the scan
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            display_cap: default_display_cap(),
            min_token_len: default_min_token_len(),
        }
    }
}

fn default_display_cap() -> usize {
    50
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
