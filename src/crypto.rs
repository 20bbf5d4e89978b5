//! Hashing primitives for HashLedger

use sha2::{Digest, Sha256};

/// Width of a rendered digest: SHA-256 output as lowercase hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// A digest rendered as fixed-width lowercase hexadecimal.
pub type HashHex = String;

/// SHA-256 of the UTF-8 bytes of `text`, as 64 lowercase hex characters.
///
/// `hex::encode` emits two characters per byte, so leading zero bytes are
/// preserved and the output is always zero-padded to full width.
pub fn digest(text: &str) -> HashHex {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_of_empty_string() {
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_is_fixed_width_lowercase() {
        for input in ["", "a", "master", "a much longer input with spaces"] {
            let d = digest(input);
            assert_eq!(d.len(), DIGEST_HEX_LEN);
            assert!(d.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("ledger"), digest("ledger"));
        assert_ne!(digest("ledger"), digest("Ledger"));
    }
}
