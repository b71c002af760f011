use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted one-time passcode.
///
/// Many rows may exist per user; only the most recently created, unconsumed,
/// unexpired, code-matching row is ever valid. `consumed` is monotonic:
/// once true it never becomes false again.
#[derive(Debug, Clone, FromRow)]
pub struct OneTimePasscode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}
