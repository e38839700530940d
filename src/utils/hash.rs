use hex;
use sha2::{Digest, Sha256};

/// Digest prefix length used as the integrity fingerprint in listings.
const PREFIX_LEN: usize = 12;

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// First 12 hex characters of the SHA-256 digest of `data`.
pub fn digest_prefix(data: &[u8]) -> String {
    let mut hash = sha256_hex(data);
    hash.truncate(PREFIX_LEN);
    hash
}
