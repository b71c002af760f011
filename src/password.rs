//! Password hashing and verification.
//!
//! Thin wrapper over bcrypt: salted, computationally expensive, and
//! verification runs in time independent of where a mismatch occurs.
//! Plaintext passwords are never logged or persisted.

use anyhow::{Context, Result};

/// Work factor for new hashes. bcrypt's default cost (12) sits in the
/// recommended 10-12 range.
pub const COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a plaintext password with a random salt.
///
/// # Errors
///
/// Returns an error if the underlying hash computation fails.
pub fn hash(plaintext: &str) -> Result<String> {
    hash_with_cost(plaintext, COST)
}

pub(crate) fn hash_with_cost(plaintext: &str, cost: u32) -> Result<String> {
    bcrypt::hash(plaintext, cost).context("failed to hash password")
}

/// Verify a plaintext password against a stored digest.
///
/// A malformed digest is a verification failure, not an error: callers get
/// `false` and the rejection stays undifferentiated.
#[must_use]
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps tests fast; production paths use `COST`.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_round_trip() -> Result<()> {
        let digest = hash_with_cost("longenough1", TEST_COST)?;
        assert!(verify("longenough1", &digest));
        assert!(!verify("wrongpassword", &digest));
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let first = hash_with_cost("longenough1", TEST_COST)?;
        let second = hash_with_cost("longenough1", TEST_COST)?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn malformed_digest_fails_verification() {
        assert!(!verify("longenough1", "not-a-bcrypt-digest"));
        assert!(!verify("longenough1", ""));
    }

    #[test]
    fn default_cost_in_recommended_range() {
        assert!((10..=12).contains(&COST));
    }
}
