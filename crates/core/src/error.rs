//! Error handling with codes, context and recovery suggestions
//!
//! Errors carry:
//! - An error code for programmatic handling
//! - Optional context and a recovery suggestion
//! - A serializable report form for `--format json` output

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    // Validation errors (6xxx)
    ValidationError = 6000,
    InvalidInput = 6001,
    InvalidFormat = 6002,
    InvalidLevel = 6003,
    DuplicateItem = 6004,
    NoValidItems = 6005,

    // Profile errors (9xxx)
    ProfileError = 9000,
    UnknownProfile = 9001,
    ProfileExists = 9002,
    InvalidMerge = 9003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            6 => "Validation",
            9 => "Profile",
            _ => "Unknown",
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            6 => exit_codes::VALIDATION_ERROR,
            9 => exit_codes::PROFILE_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check that the file exists and you have read permissions")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .mydna.toml file or use --config to specify a path")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    pub fn invalid_level(level: i64) -> Self {
        Self::new(
            ErrorCode::InvalidLevel,
            format!("Invalid intolerance level: {}", level),
        )
        .with_suggestion("Use 1 (mild), 2 (moderate) or 3 (severe)")
    }

    pub fn duplicate_item(item: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateItem,
            format!("Intolerance already in profile: {}", item),
        )
    }

    pub fn unknown_profile(name: &str) -> Self {
        Self::new(ErrorCode::UnknownProfile, format!("Unknown profile: {}", name))
            .with_suggestion("Run `mydna profile list` to see available profiles")
    }

    pub fn profile_exists(name: &str) -> Self {
        Self::new(
            ErrorCode::ProfileExists,
            format!("Profile already exists: {}", name),
        )
    }
}

/// Serializable error report for logging and JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Also used when a scan or test flagged intolerances
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const PROFILE_ERROR: i32 = 4;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidFormat, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::InvalidLevel.to_string(), "E6003");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::UnknownProfile.category(), "Profile");
    }

    #[test]
    fn test_error_code_exit_code() {
        assert_eq!(ErrorCode::UnknownProfile.exit_code(), exit_codes::PROFILE_ERROR);
        assert_eq!(ErrorCode::NoValidItems.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(ErrorCode::IoError.exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::file_not_found("/path/to/profiles.json")
            .with_context("While loading profiles");

        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_error_display() {
        let err = Error::unknown_profile("Rex");
        let text = err.to_string();
        assert!(text.starts_with("[E9001] Unknown profile: Rex"));
        assert!(text.contains("Suggestion:"));
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::invalid_level(7).with_context("Importing profile");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E6003"));
        assert!(json.contains("Validation"));
        assert!(json.contains("INVALID_LEVEL"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::io("disk full"));
        let err = result.context("Saving profiles").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("Saving profiles"));
    }
}
