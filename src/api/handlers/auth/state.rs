//! Auth configuration and shared state.

use crate::api::email::Mailer;
use crate::cli::globals::GlobalArgs;
use crate::otp::OtpGenerator;
use crate::token::TokenIssuer;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_LOGIN_OTP_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_RESEND_OTP_TTL_SECONDS: u64 = 2 * 60;
const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: u64 = 60 * 60;
const DEFAULT_RATE_LIMIT_MAX_PER_WINDOW: i64 = 3;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    login_otp_ttl: Duration,
    resend_otp_ttl: Duration,
    rate_limit_window: Duration,
    rate_limit_max_per_window: i64,
    debug_otp: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_otp_ttl: Duration::from_secs(DEFAULT_LOGIN_OTP_TTL_SECONDS),
            resend_otp_ttl: Duration::from_secs(DEFAULT_RESEND_OTP_TTL_SECONDS),
            rate_limit_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECONDS),
            rate_limit_max_per_window: DEFAULT_RATE_LIMIT_MAX_PER_WINDOW,
            debug_otp: false,
        }
    }

    /// Echo raw OTPs in API responses. Development only; must stay off in
    /// any non-development deployment.
    #[must_use]
    pub fn with_debug_otp(mut self, debug_otp: bool) -> Self {
        self.debug_otp = debug_otp;
        self
    }

    #[must_use]
    pub fn login_otp_ttl(&self) -> Duration {
        self.login_otp_ttl
    }

    #[must_use]
    pub fn resend_otp_ttl(&self) -> Duration {
        self.resend_otp_ttl
    }

    #[must_use]
    pub fn rate_limit_window(&self) -> Duration {
        self.rate_limit_window
    }

    #[must_use]
    pub fn rate_limit_max_per_window(&self) -> i64 {
        self.rate_limit_max_per_window
    }

    #[must_use]
    pub fn debug_otp(&self) -> bool {
        self.debug_otp
    }
}

/// Shared auth state: configuration, the OTP generator, the token issuer,
/// and the outbound mailer. Built once at startup from the process-wide
/// secrets and injected into handlers as an `Extension`.
#[derive(Clone)]
pub struct AuthState {
    config: AuthConfig,
    generator: OtpGenerator,
    tokens: TokenIssuer,
    mailer: Arc<dyn Mailer>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, globals: &GlobalArgs, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            generator: OtpGenerator::new(globals.otp_secret.clone()),
            tokens: TokenIssuer::new(&globals.token_secret),
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn generator(&self) -> &OtpGenerator {
        &self.generator
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    #[must_use]
    pub fn mailer(&self) -> &Arc<dyn Mailer> {
        &self.mailer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_protocol() {
        let config = AuthConfig::new();
        assert_eq!(config.login_otp_ttl(), Duration::from_secs(300));
        assert_eq!(config.resend_otp_ttl(), Duration::from_secs(120));
        assert_eq!(config.rate_limit_window(), Duration::from_secs(3600));
        assert_eq!(config.rate_limit_max_per_window(), 3);
        assert!(!config.debug_otp());
    }

    #[test]
    fn debug_otp_builder() {
        let config = AuthConfig::new().with_debug_otp(true);
        assert!(config.debug_otp());
    }
}
