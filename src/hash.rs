//! Double SHA-256 over byte ranges
//! Uses the sha2 crate.

use sha2::{Digest, Sha256};

/// Double SHA-256 of several slices hashed back to back
///
/// Lets the txid be computed from the raw buffer without copying out the
/// stripped serialization.
pub fn hash256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Sha256::digest(hasher.finalize()).into()
}

/// Double SHA-256 (used in Bitcoin)
pub fn hash256(data: &[u8]) -> [u8; 32] {
    hash256_parts(&[data])
}

/// Hex in display order (reversed), as block explorers show ids
pub fn to_display_hex(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash256_vectors() {
        assert_eq!(
            hex::encode(hash256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
        assert_eq!(
            hex::encode(hash256(b"hello")),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }

    #[test]
    fn test_parts_match_concatenation() {
        let whole = hash256(b"version|body|locktime");
        let split = hash256_parts(&[b"version|", b"body|", b"locktime"]);
        assert_eq!(whole, split);
    }

    #[test]
    fn test_display_hex_reverses() {
        let mut hash = [0u8; 32];
        hash[0] = 0xaa;
        hash[31] = 0x01;
        let shown = to_display_hex(&hash);
        assert!(shown.starts_with("01"));
        assert!(shown.ends_with("aa"));
    }
}
