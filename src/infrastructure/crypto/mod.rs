//! Cryptographic helpers: JWT, password hashing, random tokens, digests

pub mod jwt;
pub mod password;

use rand::RngCore;
use sha2::{Digest, Sha256};

/// `prefix` followed by `bytes` random bytes in hex, e.g. `pi_3f9a...`
pub fn random_token(prefix: &str, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    format!("{}{}", prefix, hex::encode(buf))
}

/// Lower-case hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tokens_have_prefix_and_length() {
        let a = random_token("pi_", 12);
        let b = random_token("pi_", 12);
        assert!(a.starts_with("pi_"));
        assert_eq!(a.len(), 3 + 24);
        assert_ne!(a, b);
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
