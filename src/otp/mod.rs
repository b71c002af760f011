//! One-time passcode generation and the persisted ledger of issued codes.

pub mod generator;
pub mod ledger;
pub mod models;

pub use generator::OtpGenerator;
pub use ledger::OtpLedger;
pub use models::OneTimePasscode;
