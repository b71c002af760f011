//! Outbound delivery abstraction.
//!
//! The actual transport (SMTP, provider API) lives outside the core; the
//! authentication state machine only depends on this trait. Both messages
//! are best-effort notifications: login dispatches the OTP in a background
//! task and swallows failures (the code is already committed), while resend
//! awaits delivery and propagates a synchronous failure to the caller.

use anyhow::Result;
use tracing::info;

pub trait Mailer: Send + Sync {
    /// Deliver a one-time passcode to the user's registered address.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport reports a failure.
    fn send_otp(&self, email: &str, code: &str) -> Result<()>;

    /// Deliver the post-registration welcome message.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport reports a failure.
    fn send_welcome(&self, email: &str, name: &str, account_identifier: &str) -> Result<()>;
}

/// Local dev mailer that logs instead of sending real email. The OTP itself
/// is never logged.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_otp(&self, email: &str, _code: &str) -> Result<()> {
        info!(to_email = %email, "otp delivery stub");
        Ok(())
    }

    fn send_welcome(&self, email: &str, name: &str, account_identifier: &str) -> Result<()> {
        info!(
            to_email = %email,
            name = %name,
            account_identifier = %account_identifier,
            "welcome delivery stub"
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Mailer;
    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test mailer that counts sends and can be told to fail.
    pub struct RecordingMailer {
        pub otp_sends: AtomicUsize,
        pub welcome_sends: AtomicUsize,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn new(fail: bool) -> Self {
            Self {
                otp_sends: AtomicUsize::new(0),
                welcome_sends: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl Mailer for RecordingMailer {
        fn send_otp(&self, _email: &str, _code: &str) -> Result<()> {
            self.otp_sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("transport unavailable"))
            } else {
                Ok(())
            }
        }

        fn send_welcome(&self, _email: &str, _name: &str, _account_identifier: &str) -> Result<()> {
            self.welcome_sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("transport unavailable"))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        assert!(mailer.send_otp("ann@x.com", "123456").is_ok());
        assert!(mailer.send_welcome("ann@x.com", "Ann", "1234567890").is_ok());
    }

    #[test]
    fn recording_mailer_counts_sends() {
        use std::sync::atomic::Ordering;

        let mailer = test_support::RecordingMailer::new(false);
        assert!(mailer.send_otp("ann@x.com", "123456").is_ok());
        assert!(mailer.send_otp("ann@x.com", "654321").is_ok());
        assert!(mailer.send_welcome("ann@x.com", "Ann", "1234567890").is_ok());
        assert_eq!(mailer.otp_sends.load(Ordering::SeqCst), 2);
        assert_eq!(mailer.welcome_sends.load(Ordering::SeqCst), 1);
    }

    // Register and login dispatch mail from a spawned task through
    // `Arc<dyn Mailer>`; the trait methods are synchronous inside it.
    #[tokio::test]
    async fn welcome_dispatch_from_background_task() {
        use std::sync::atomic::Ordering;
        use std::sync::Arc;

        let recorder = Arc::new(test_support::RecordingMailer::new(false));
        let mailer: Arc<dyn Mailer> = recorder.clone();

        let task = tokio::spawn(async move {
            mailer
                .send_welcome("ann@x.com", "Ann", "1234567890")
                .is_ok()
        });

        assert!(task.await.expect("task completes"));
        assert_eq!(recorder.welcome_sends.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recording_mailer_surfaces_transport_failures() {
        use std::sync::atomic::Ordering;

        let mailer = test_support::RecordingMailer::new(true);
        assert!(mailer.send_otp("ann@x.com", "123456").is_err());
        assert_eq!(mailer.otp_sends.load(Ordering::SeqCst), 1);
    }
}
