//! Unified error types for the transaction decoder

use thiserror::Error;

/// Main error type for decoding
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: u64,
        remaining: usize,
    },

    #[error("malformed hex: {0}")]
    MalformedHex(#[from] hex::FromHexError),

    #[error("non-minimal varint at offset {offset} (value {value})")]
    NonMinimalVarint { offset: usize, value: u64 },

    #[error("{count} trailing bytes after locktime at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True for the short-read family of failures
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::TruncatedInput { .. })
    }
}

impl From<toml::de::Error> for DecodeError {
    fn from(e: toml::de::Error) -> Self {
        DecodeError::Config(e.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DecodeError>;
