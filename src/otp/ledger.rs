//! Persisted ledger of issued one-time passcodes.
//!
//! The ledger enforces the two invariants with real teeth: bounded issuance
//! rate (checked before any code is generated) and at-most-once consumption
//! (a single conditional UPDATE, so two concurrent presentations of the same
//! valid code resolve to exactly one success).

use crate::otp::models::OneTimePasscode;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

pub struct OtpLedger;

impl OtpLedger {
    /// Count passcodes issued to a user within the trailing `window`.
    ///
    /// Used for rate limiting. The count-then-issue sequence is a soft
    /// limit: under heavy concurrent load the threshold may be exceeded by
    /// one. Accepted as-is; the threshold is not a security boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_recent(pool: &PgPool, user_id: Uuid, window: Duration) -> Result<i64> {
        let query = r"
            SELECT COUNT(*) FROM otps
            WHERE user_id = $1
              AND created_at > NOW() - ($2 * INTERVAL '1 second')
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let count: i64 = sqlx::query_scalar(query)
            .bind(user_id)
            .bind(i64::try_from(window.as_secs()).unwrap_or(i64::MAX))
            .fetch_one(pool)
            .instrument(span)
            .await
            .context("failed to count recent passcodes")?;

        Ok(count)
    }

    /// Persist a freshly generated code with `expires_at = NOW() + ttl` and
    /// `consumed = FALSE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; issuance failures are hard
    /// errors, never silently dropped.
    pub async fn issue(
        pool: &PgPool,
        user_id: Uuid,
        code: &str,
        ttl: Duration,
    ) -> Result<OneTimePasscode> {
        let query = r"
            INSERT INTO otps (id, user_id, code, expires_at)
            VALUES ($1, $2, $3, NOW() + ($4 * INTERVAL '1 second'))
            RETURNING id, user_id, code, expires_at, consumed, created_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query_as::<_, OneTimePasscode>(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(code)
            .bind(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
            .fetch_one(pool)
            .instrument(span)
            .await
            .context("failed to persist passcode")
    }

    /// Atomically consume the most recent matching, unconsumed, unexpired
    /// code for `user_id`. Returns `true` iff exactly one row flipped.
    ///
    /// The outer `consumed = FALSE` predicate is re-evaluated after row
    /// locking, so concurrent callers cannot both observe an unconsumed row:
    /// there is no separate read-then-write window.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn consume(pool: &PgPool, user_id: Uuid, code: &str) -> Result<bool> {
        let query = r"
            UPDATE otps SET consumed = TRUE
            WHERE id = (
                SELECT id FROM otps
                WHERE user_id = $1
                  AND code = $2
                  AND consumed = FALSE
                  AND expires_at > NOW()
                ORDER BY created_at DESC
                LIMIT 1
            )
            AND consumed = FALSE
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(user_id)
            .bind(code)
            .execute(pool)
            .instrument(span)
            .await
            .context("failed to consume passcode")?;

        Ok(result.rows_affected() == 1)
    }
}
