//! # Twogate (Two-Factor Authentication Service)
//!
//! `twogate` authenticates users in two factors: a long-lived password check
//! followed by a short-lived one-time passcode (OTP) delivered out of band,
//! concluding in issuance of a signed 24-hour bearer token.
//!
//! ## Flow
//!
//! - **Register:** validate name/email/password, auto-assign a unique
//!   10-digit account identifier, bcrypt-hash the password, and store the
//!   user. A welcome email is dispatched best-effort.
//! - **Login:** verify credentials, rate-check OTP issuance (3 per rolling
//!   hour), derive a 6-digit code from the server OTP secret, persist it with
//!   a 5-minute expiry, and dispatch delivery in the background. Bad
//!   credentials always produce the same undifferentiated rejection to
//!   resist account enumeration.
//! - **Verify OTP:** atomically consume the most recent matching unconsumed,
//!   unexpired code. A given code can succeed exactly once, even under
//!   concurrent presentation. Success mints an HS256 bearer token.
//! - **Protected routes:** a guard extracts and verifies the bearer token
//!   before the handler runs; any structural, signature, or expiry failure
//!   collapses to a single 401.
//!
//! ## Secrets
//!
//! The token signing secret and OTP derivation secret are loaded once at
//! startup and passed into constructors as read-only values. The service
//! refuses to start without a token secret.

pub mod api;
pub mod cli;
pub mod otp;
pub mod password;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
