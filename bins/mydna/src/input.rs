//! Where command text comes from

use anyhow::Context as _;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Text given inline, from a file, or piped on stdin
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Text to process (reads stdin when neither TEXT nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(mydna_core::Error::file_not_found(path).into());
            }
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    }
}
