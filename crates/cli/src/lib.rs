//! CLI utilities for the MyDNA intolerance tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Plain-text rendering of scan, test and compare reports

#![warn(missing_docs)]

pub mod output;
pub mod report;
