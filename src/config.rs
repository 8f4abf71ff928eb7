//! Strictness options for the decoder
//!
//! The defaults accept what real-world decoders accept: non-minimal
//! varints and bytes after the locktime. Both can be tightened.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// What to do with bytes left over after the locktime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingData {
    #[default]
    Allow,
    Reject,
}

/// Whether varints must use their shortest encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VarintPolicy {
    #[default]
    Permissive,
    Minimal,
}

/// Decoder options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    pub trailing: TrailingData,
    pub varints: VarintPolicy,
}

impl DecodeOptions {
    /// Reject trailing bytes and non-minimal varints
    pub fn strict() -> Self {
        DecodeOptions {
            trailing: TrailingData::Reject,
            varints: VarintPolicy::Minimal,
        }
    }

    /// Parse options from a TOML document
    ///
    /// # Errors
    /// Returns `DecodeError::Config` on syntax errors or unknown keys
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load options from a TOML file
    ///
    /// # Errors
    /// Returns `DecodeError::Io` if the file cannot be read, or
    /// `DecodeError::Config` if it does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
