//! Keyed derivation of 6-digit one-time passcodes.
//!
//! Codes are derived with HMAC-SHA256 over a context buffer built from the
//! subject id, a high-resolution timestamp, and a per-call nonce. This is a
//! deterministic pseudorandom function: the same secret and inputs reproduce
//! the same code, so callers must never repeat the instant/nonce pair for a
//! subject. Secrecy rests entirely on the server-held derivation secret; an
//! adversary holding it can recompute any code offline from the non-secret
//! inputs.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Number of digits in a generated code.
pub const OTP_DIGITS: usize = 6;

/// Derives 6-digit codes from a server-held secret.
#[derive(Clone)]
pub struct OtpGenerator {
    secret: SecretString,
}

impl OtpGenerator {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Generate a 6-digit code for `subject_id` at `instant` with a fresh
    /// `nonce`. Output is always exactly 6 ASCII digits and the first digit
    /// is never `0`: a leading zero is replaced with `1`. The replacement is
    /// an intentional UX choice from the source design, not a security
    /// property, and it biases the first digit toward `1`.
    #[must_use]
    pub fn generate(&self, subject_id: Uuid, instant: DateTime<Utc>, nonce: &str) -> String {
        let context = format!(
            "{}:{}:{}",
            subject_id,
            instant.timestamp_micros(),
            nonce
        );

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(context.as_bytes());
        let digest = mac.finalize().into_bytes();

        let mut code: String = digest
            .iter()
            .take(OTP_DIGITS)
            .map(|byte| char::from(b'0' + byte % 10))
            .collect();

        if code.starts_with('0') {
            code.replace_range(0..1, "1");
        }

        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> OtpGenerator {
        OtpGenerator::new(SecretString::from("test-derivation-secret".to_string()))
    }

    #[test]
    fn output_is_six_ascii_digits_first_nonzero() {
        let generator = generator();
        let subject = Uuid::new_v4();
        for i in 0..200 {
            let code = generator.generate(subject, Utc::now(), &format!("nonce-{i}"));
            assert_eq!(code.len(), OTP_DIGITS);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "code: {code}");
            assert_ne!(code.as_bytes()[0], b'0', "leading zero in {code}");
        }
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let generator = generator();
        let subject = Uuid::new_v4();
        let instant = Utc::now();
        let first = generator.generate(subject, instant, "nonce");
        let second = generator.generate(subject, instant, "nonce");
        assert_eq!(first, second);
    }

    #[test]
    fn nonce_changes_the_code() {
        let generator = generator();
        let subject = Uuid::new_v4();
        let instant = Utc::now();
        let first = generator.generate(subject, instant, "nonce-a");
        let second = generator.generate(subject, instant, "nonce-b");
        // Collisions are possible in a 6-digit space but vanishingly
        // unlikely for a single fixed pair of nonces.
        assert_ne!(first, second);
    }

    #[test]
    fn secret_changes_the_code() {
        let subject = Uuid::new_v4();
        let instant = Utc::now();
        let first = OtpGenerator::new(SecretString::from("secret-a".to_string()))
            .generate(subject, instant, "nonce");
        let second = OtpGenerator::new(SecretString::from("secret-b".to_string()))
            .generate(subject, instant, "nonce");
        assert_ne!(first, second);
    }
}
