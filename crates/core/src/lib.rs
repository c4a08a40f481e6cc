//! Core types for the MyDNA intolerance tools
//!
//! This crate provides what the matching engine deliberately leaves out:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Profiles**: Validated intolerance profiles and the profile book
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust
//! use mydna_core::profile::ProfileBook;
//!
//! let json = r#"{"profiles": [{"name": "Rex", "intolerances": [
//!     {"item": "Corn", "category": "Grain", "level": 3}
//! ]}]}"#;
//!
//! let (book, report) = ProfileBook::from_json(json).unwrap();
//! assert_eq!(report.accepted, 1);
//! assert_eq!(book.names(), vec!["Rex"]);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod profile;

pub use config::Config;
pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::profile::{
        ImportReport, IntoleranceItem, Level, Profile, ProfileBook, ProfileStats, SearchHit,
    };
}
