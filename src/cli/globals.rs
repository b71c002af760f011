use secrecy::SecretString;

/// Process-wide secrets and flags, loaded once at startup and immutable
/// thereafter. Passed into constructors rather than read from the
/// environment so the core stays testable without env mutation.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Secret used to sign and verify session tokens (HS256).
    pub token_secret: SecretString,
    /// Secret used for keyed OTP derivation. Defaults to the token secret
    /// when not configured separately.
    pub otp_secret: SecretString,
    /// Development-only flag: include the raw OTP in API responses.
    pub debug_otp: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString, otp_secret: SecretString, debug_otp: bool) -> Self {
        Self {
            token_secret,
            otp_secret,
            debug_otp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            SecretString::from("token-secret".to_string()),
            SecretString::from("otp-secret".to_string()),
            false,
        );
        assert_eq!(args.token_secret.expose_secret(), "token-secret");
        assert_eq!(args.otp_secret.expose_secret(), "otp-secret");
        assert!(!args.debug_otp);
    }
}
