//! Two-factor authentication handlers.
//!
//! The flow is password first (`/login`), then a short-lived emailed OTP
//! (`/verify-otp`), which yields a signed bearer token for protected routes.
//! `/resend-otp` re-issues a code with a shorter validity window, and all
//! failure responses stay undifferentiated so callers cannot probe which
//! accounts exist.

pub(crate) mod guard;
pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod resend;
mod state;
pub(crate) mod storage;
pub(crate) mod types;
mod utils;
pub(crate) mod verify;

pub use login::login;
pub use register::register;
pub use resend::resend_otp;
pub use state::{AuthConfig, AuthState};
pub use verify::verify_otp;
