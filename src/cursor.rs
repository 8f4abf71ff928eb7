//! Byte cursor and primitive readers for the transaction wire format
//! Reference: https://en.bitcoin.it/wiki/Protocol_documentation#Variable_length_integer

use crate::config::VarintPolicy;
use crate::error::{DecodeError, Result};

/// Read position over a borrowed byte slice
///
/// The position only moves forward and never passes the end of the data.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    varints: VarintPolicy,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor {
            data,
            pos: 0,
            varints: VarintPolicy::Permissive,
        }
    }

    pub fn with_varint_policy(mut self, policy: VarintPolicy) -> Self {
        self.varints = policy;
        self
    }

    /// Current offset from the start of the data
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The full underlying buffer, independent of position
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn truncated(&self, needed: u64) -> DecodeError {
        DecodeError::TruncatedInput {
            offset: self.pos,
            needed,
            remaining: self.remaining(),
        }
    }

    /// Look at the next `N` bytes without consuming them
    pub fn peek_array<const N: usize>(&self) -> Option<[u8; N]> {
        self.data
            .get(self.pos..self.pos + N)
            .and_then(|s| s.try_into().ok())
    }

    /// Consume exactly `n` bytes
    ///
    /// # Errors
    /// Returns `DecodeError::TruncatedInput` if fewer than `n` bytes remain;
    /// the position is left unchanged in that case
    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(self.truncated(n as u64));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_fixed_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Decode a 4-byte little-endian integer
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Decode an 8-byte little-endian integer
    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Decode a variable-length integer
    ///
    /// Under `VarintPolicy::Permissive` a value may use a wider form than
    /// needed (5 encoded as `fd 05 00` is accepted).
    ///
    /// # Errors
    /// Returns `DecodeError::TruncatedInput` if the prefix or its payload is
    /// missing, or `DecodeError::NonMinimalVarint` under
    /// `VarintPolicy::Minimal`
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.pos;
        let (value, min) = match self.read_u8()? {
            0xfd => (u16::from_le_bytes(self.read_array()?) as u64, 0xfd),
            0xfe => (u32::from_le_bytes(self.read_array()?) as u64, 0x1_0000),
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            n => (n as u64, 0),
        };

        if self.varints == VarintPolicy::Minimal && value < min {
            return Err(DecodeError::NonMinimalVarint {
                offset: start,
                value,
            });
        }
        Ok(value)
    }

    /// Decode a varint length followed by that many bytes
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| self.truncated(len))?;
        self.read_fixed_bytes(len)
    }
}
