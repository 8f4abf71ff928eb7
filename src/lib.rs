//! Bitcoin transaction decoder
//!
//! Turns a raw transaction (hex or bytes, legacy or segwit) into a
//! structured record. Purely syntactic: nothing is validated beyond the
//! lengths being self-consistent.

pub mod config;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod transaction;

pub use error::{DecodeError, Result};

pub use config::{DecodeOptions, TrailingData, VarintPolicy};
pub use cursor::ByteCursor;
pub use transaction::{
    SATS_PER_BTC, Transaction, TxIn, TxOut, Witness, decode, decode_bytes, decode_with,
};
