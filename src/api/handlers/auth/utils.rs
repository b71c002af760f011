//! Small helpers for input validation and account identifier generation.

use rand::Rng;
use regex::Regex;

/// Minimum password length accepted at registration.
pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum display-name length accepted at registration.
pub(crate) const MIN_NAME_LENGTH: usize = 2;

/// Length of the auto-generated numeric account identifier.
pub(crate) const ACCOUNT_IDENTIFIER_LENGTH: usize = 10;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

pub(crate) fn valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
}

pub(crate) fn valid_name(name: &str) -> bool {
    name.len() >= MIN_NAME_LENGTH
}

/// Account identifiers are exactly 10 ASCII digits.
pub(crate) fn valid_account_identifier(account_identifier: &str) -> bool {
    account_identifier.len() == ACCOUNT_IDENTIFIER_LENGTH
        && account_identifier.bytes().all(|b| b.is_ascii_digit())
}

/// OTP codes are exactly 6 ASCII digits.
pub(crate) fn valid_otp_format(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Generate a candidate 10-digit account identifier. Uniqueness is the
/// caller's concern: regenerate on collision against the store.
pub(crate) fn generate_account_identifier() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCOUNT_IDENTIFIER_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Ann@Example.COM "), "ann@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("ann@x.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_password_enforces_minimum_length() {
        assert!(valid_password("longenough1"));
        assert!(valid_password("12345678"));
        assert!(!valid_password("1234567"));
    }

    #[test]
    fn valid_name_enforces_minimum_length() {
        assert!(valid_name("Ann"));
        assert!(valid_name("Jo"));
        assert!(!valid_name("J"));
    }

    #[test]
    fn valid_account_identifier_requires_ten_digits() {
        assert!(valid_account_identifier("1234567890"));
        assert!(!valid_account_identifier("123456789"));
        assert!(!valid_account_identifier("12345678901"));
        assert!(!valid_account_identifier("12345abcde"));
    }

    #[test]
    fn valid_otp_format_requires_six_digits() {
        assert!(valid_otp_format("123456"));
        assert!(!valid_otp_format("12345"));
        assert!(!valid_otp_format("1234567"));
        assert!(!valid_otp_format("12345a"));
    }

    #[test]
    fn generated_account_identifier_is_well_formed() {
        for _ in 0..100 {
            let candidate = generate_account_identifier();
            assert!(valid_account_identifier(&candidate), "got {candidate}");
        }
    }
}
