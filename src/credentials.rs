//! One-way password digests.
//!
//! Digests are bcrypt strings; the random per-credential salt and the cost are
//! embedded in the stored value, so [`PasswordHasher::matches`] needs nothing
//! but the plaintext and the stored digest.

use bcrypt::{hash, hash_with_salt, verify, BcryptError, Version};

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Digest with a freshly generated random salt.
    pub fn digest(&self, plaintext: &str) -> Result<String, BcryptError> {
        hash(plaintext, self.cost)
    }

    /// Deterministic digest for a caller-supplied salt.
    pub fn digest_with_salt(&self, plaintext: &str, salt: [u8; 16]) -> Result<String, BcryptError> {
        hash_with_salt(plaintext, self.cost, salt).map(|parts| parts.format_for_version(Version::TwoB))
    }

    /// Recomputes the digest with the salt stored in `digest` and compares.
    /// A malformed stored digest never matches.
    pub fn matches(&self, plaintext: &str, digest: &str) -> bool {
        verify(plaintext, digest).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn digest_is_deterministic_for_a_given_salt() {
        let hasher = PasswordHasher::new(COST);
        let salt = [7u8; 16];
        let a = hasher.digest_with_salt("hunter22", salt).unwrap();
        let b = hasher.digest_with_salt("hunter22", salt).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, "hunter22");
    }

    #[test]
    fn random_salt_gives_distinct_digests_that_both_match() {
        let hasher = PasswordHasher::new(COST);
        let a = hasher.digest("hunter22").unwrap();
        let b = hasher.digest("hunter22").unwrap();
        assert_ne!(a, b);
        assert!(hasher.matches("hunter22", &a));
        assert!(hasher.matches("hunter22", &b));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hasher = PasswordHasher::new(COST);
        let digest = hasher.digest("correct horse").unwrap();
        assert!(!hasher.matches("battery staple", &digest));
    }

    #[test]
    fn plaintext_stored_by_mistake_never_matches() {
        let hasher = PasswordHasher::new(COST);
        assert!(!hasher.matches("hunter22", "hunter22"));
        assert!(!hasher.matches("", ""));
    }
}
