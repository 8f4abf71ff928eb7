//! The Transaction object in Bitcoin
//! Reference: https://en.bitcoin.it/wiki/Transaction
//!
//! Wire layout, legacy and BIP144 (segwit):
//!
//! ```text
//! version(4) [marker(1)=0x00 flag(1)!=0x00] inputs outputs [witnesses] locktime(4)
//! ```

use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::config::{DecodeOptions, TrailingData};
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::hash::{hash256_parts, to_display_hex};

/// Satoshis per bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

const SEGWIT_MARKER: u8 = 0x00;
const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Decode a transaction from hex with the default (permissive) options
///
/// # Errors
/// Returns `DecodeError::MalformedHex` for bad hex and
/// `DecodeError::TruncatedInput` when a field runs past the end
pub fn decode(tx_hex: &str) -> Result<Transaction> {
    decode_with(tx_hex, &DecodeOptions::default())
}

/// Decode a transaction from hex
///
/// Surrounding whitespace is ignored; anything else that is not an even
/// number of hex digits is rejected before parsing starts.
pub fn decode_with(tx_hex: &str, opts: &DecodeOptions) -> Result<Transaction> {
    let raw = hex::decode(tx_hex.trim())?;
    decode_bytes(&raw, opts)
}

/// Decode a transaction from raw bytes
pub fn decode_bytes(raw: &[u8], opts: &DecodeOptions) -> Result<Transaction> {
    let mut cursor = ByteCursor::new(raw).with_varint_policy(opts.varints);
    let tx = Transaction::decode(&mut cursor)?;

    if opts.trailing == TrailingData::Reject && !cursor.is_empty() {
        return Err(DecodeError::TrailingBytes {
            offset: cursor.position(),
            count: cursor.remaining(),
        });
    }

    Ok(tx)
}

/// Sizes and ids derived from where each section sat in the raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    size: usize,
    base_size: usize,
    txid: [u8; 32],
    wtxid: [u8; 32],
}

/// Bitcoin Transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub version: u32,
    pub segwit: bool,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    /// One stack per input when `segwit`, otherwise empty
    pub witnesses: Vec<Witness>,
    pub locktime: u32,
    #[serde(skip)]
    layout: Layout,
}

impl Transaction {
    /// Decode a transaction starting at the cursor position
    ///
    /// Bytes after the locktime are left unread.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let start = cursor.position();
        let version = cursor.read_u32_le()?;

        // Marker/flag are only consumed when they signal segwit; otherwise
        // they are the input count and whatever follows it.
        let segwit = match cursor.peek_array::<2>() {
            Some([SEGWIT_MARKER, flag]) if flag != 0 => {
                cursor.read_fixed_bytes(2)?;
                true
            }
            _ => false,
        };

        let body_start = cursor.position();

        let num_inputs = cursor.read_varint()?;
        let mut inputs = Vec::new();
        for _ in 0..num_inputs {
            inputs.push(TxIn::decode(cursor)?);
        }

        let num_outputs = cursor.read_varint()?;
        let mut outputs = Vec::new();
        for _ in 0..num_outputs {
            outputs.push(TxOut::decode(cursor)?);
        }

        let body_end = cursor.position();

        let mut witnesses = Vec::new();
        if segwit {
            for _ in 0..inputs.len() {
                witnesses.push(Witness::decode(cursor)?);
            }
        }

        let locktime = cursor.read_u32_le()?;
        let end = cursor.position();

        let data = cursor.data();
        let version_bytes = &data[start..start + 4];
        let body = &data[body_start..body_end];
        let locktime_bytes = &data[end - 4..end];

        let layout = Layout {
            size: end - start,
            base_size: version_bytes.len() + body.len() + locktime_bytes.len(),
            txid: hash256_parts(&[version_bytes, body, locktime_bytes]),
            wtxid: hash256_parts(&[&data[start..end]]),
        };

        Ok(Transaction {
            version,
            segwit,
            inputs,
            outputs,
            witnesses,
            locktime,
            layout,
        })
    }

    /// Transaction id: hash of the serialization without witness data
    pub fn txid(&self) -> String {
        to_display_hex(&self.layout.txid)
    }

    /// Witness transaction id; equal to `txid` for legacy transactions
    pub fn wtxid(&self) -> String {
        to_display_hex(&self.layout.wtxid)
    }

    /// Total serialized size in bytes, trailing data excluded
    pub fn size(&self) -> usize {
        self.layout.size
    }

    /// Size without marker, flag and witnesses
    pub fn base_size(&self) -> usize {
        self.layout.base_size
    }

    /// BIP141 weight units
    pub fn weight(&self) -> usize {
        self.layout.base_size * 3 + self.layout.size
    }

    /// Virtual size, weight / 4 rounded up
    pub fn vsize(&self) -> usize {
        self.weight().div_ceil(4)
    }

    /// Check if this is a coinbase transaction
    pub fn is_coinbase(&self) -> bool {
        match self.inputs.as_slice() {
            [only] => only.prev_tx == [0u8; 32] && only.prev_index == 0xffffffff,
            _ => false,
        }
    }

    /// Sum of all output values, `None` if it overflows a u64
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.value))
    }

    /// BIP125 opt-in replace-by-fee signal
    pub fn signals_rbf(&self) -> bool {
        self.inputs.iter().any(|i| i.sequence < SEQUENCE_FINAL - 1)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction ID: {}", self.txid())?;
        if self.segwit {
            writeln!(f, "Witness ID:     {}", self.wtxid())?;
        }
        writeln!(f, "Version:  {}", self.version)?;
        writeln!(f, "SegWit:   {}", self.segwit)?;
        writeln!(
            f,
            "Size:     {} bytes ({} vbytes, {} WU)",
            self.size(),
            self.vsize(),
            self.weight()
        )?;
        writeln!(f, "Locktime: {}", self.locktime)?;

        writeln!(f, "\nInputs ({}):", self.inputs.len())?;
        for (i, input) in self.inputs.iter().enumerate() {
            writeln!(f, "  [{}] prev_tx: {}:{}", i, hex::encode(input.prev_tx), input.prev_index)?;
            writeln!(f, "      scriptSig: {}", hex::encode(&input.script_sig))?;
            writeln!(f, "      sequence: 0x{:08x}", input.sequence)?;
            if let Some(witness) = self.witnesses.get(i) {
                writeln!(f, "      witness ({} items):", witness.len())?;
                for item in witness.iter() {
                    writeln!(f, "        {}", hex::encode(item))?;
                }
            }
        }

        writeln!(f, "\nOutputs ({}):", self.outputs.len())?;
        for (i, output) in self.outputs.iter().enumerate() {
            writeln!(f, "  [{}] {} satoshis ({:.8} BTC)", i, output.value, output.btc())?;
            write!(f, "      scriptPubKey: {}", hex::encode(&output.script_pubkey))?;
            if i + 1 < self.outputs.len() {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

/// Transaction Input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxIn {
    /// Previous transaction id, in display (reversed) byte order
    #[serde(rename = "txid", serialize_with = "hex::serde::serialize")]
    pub prev_tx: [u8; 32],
    #[serde(rename = "vout")]
    pub prev_index: u32,
    #[serde(rename = "scriptSig", serialize_with = "hex::serde::serialize")]
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

impl TxIn {
    /// Decode from bytes
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut prev_tx: [u8; 32] = cursor.read_array()?;
        prev_tx.reverse(); // Little-endian

        let prev_index = cursor.read_u32_le()?;
        let script_sig = cursor.read_var_bytes()?.to_vec();
        let sequence = cursor.read_u32_le()?;

        Ok(TxIn {
            prev_tx,
            prev_index,
            script_sig,
            sequence,
        })
    }

    /// Sequence disables both locktime and RBF for this input
    pub fn is_final(&self) -> bool {
        self.sequence == SEQUENCE_FINAL
    }
}

/// Transaction Output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Amount in satoshis, exactly as encoded
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// Decode from bytes
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let value = cursor.read_u64_le()?;
        let script_pubkey = cursor.read_var_bytes()?.to_vec();
        Ok(TxOut {
            value,
            script_pubkey,
        })
    }

    /// Amount in BTC
    ///
    /// Lossy: an f64 cannot hold every satoshi amount exactly. Use `value`
    /// for anything that adds or compares amounts.
    pub fn btc(&self) -> f64 {
        self.value as f64 / SATS_PER_BTC as f64
    }
}

impl Serialize for TxOut {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("TxOut", 3)?;
        out.serialize_field("value", &self.btc())?;
        out.serialize_field("value_sats", &self.value)?;
        out.serialize_field("scriptPubKey", &hex::encode(&self.script_pubkey))?;
        out.end()
    }
}

/// Witness stack for one input; items are opaque byte strings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Witness(pub Vec<Vec<u8>>);

impl Witness {
    /// Decode an item count followed by length-prefixed items
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let num_items = cursor.read_varint()?;
        let mut items = Vec::new();
        for _ in 0..num_items {
            items.push(cursor.read_var_bytes()?.to_vec());
        }
        Ok(Witness(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }
}

impl Serialize for Witness {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(hex::encode))
    }
}
