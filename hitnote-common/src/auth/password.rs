//! Credential engine: one-way password hashing and verification
//!
//! bcrypt only consumes the first 72 bytes of its input. Both entry points
//! apply the same truncation up front, so longer passwords are silently
//! trimmed rather than rejected, and two passwords that agree on their
//! first 72 bytes verify interchangeably. This is the contract of the
//! primitive, not a bug; callers must not assume the full password
//! contributes to the hash.

use crate::{Error, Result};

/// Input limit of the bcrypt primitive, in bytes.
const BCRYPT_MAX_BYTES: usize = 72;

fn truncate(plain: &str) -> &[u8] {
    let bytes = plain.as_bytes();
    &bytes[..bytes.len().min(BCRYPT_MAX_BYTES)]
}

/// Hash a password for storage.
pub fn hash_password(plain: &str) -> Result<String> {
    bcrypt::hash(truncate(plain), bcrypt::DEFAULT_COST)
        .map_err(|e| Error::Internal(format!("bcrypt hash failed: {}", e)))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    bcrypt::verify(truncate(plain), hashed)
        .map_err(|e| Error::Internal(format!("bcrypt verify failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_verifies_against_own_hash() {
        let hash = hash_password("segredo123").unwrap();
        assert!(verify_password("segredo123", &hash).unwrap());
        assert!(!verify_password("segredo124", &hash).unwrap());
    }

    #[test]
    fn inputs_identical_up_to_72_bytes_verify_as_equal() {
        // Documented limitation of the underlying primitive: only the first
        // 72 bytes contribute to the hash. Two passwords differing only
        // past byte 72 must both verify against the same hash.
        let base = "x".repeat(72);
        let long_a = format!("{}AAAA", base);
        let long_b = format!("{}BBBB", base);

        let hash = hash_password(&long_a).unwrap();
        assert!(verify_password(&long_a, &hash).unwrap());
        assert!(verify_password(&long_b, &hash).unwrap());
        assert!(verify_password(&base, &hash).unwrap());
    }

    #[test]
    fn difference_within_first_72_bytes_still_rejected() {
        let base = "x".repeat(71);
        let hash = hash_password(&format!("{}A", base)).unwrap();
        assert!(!verify_password(&format!("{}B", base), &hash).unwrap());
    }
}
