//! Database helpers for user records.
//!
//! The credential store owns the `users` table; the core only performs
//! lookup-by-identifier and create operations. Users are immutable after
//! registration.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::utils::is_unique_violation;

/// Full user row. `password_hash` never leaves the storage layer except for
/// verification; it is excluded from every response type.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) account_identifier: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    #[allow(dead_code)]
    pub(crate) created_at: DateTime<Utc>,
}

/// Public user fields returned by verify-otp and protected routes.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub account_identifier: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            account_identifier: user.account_identifier.clone(),
            email: user.email.clone(),
        }
    }
}

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(crate) enum SignupOutcome {
    Created(User),
    /// Unique violation on email or account identifier.
    Conflict,
}

pub(crate) async fn lookup_by_account(
    pool: &PgPool,
    account_identifier: &str,
) -> Result<Option<User>> {
    let query = r"
        SELECT id, name, account_identifier, email, password_hash, created_at
        FROM users WHERE account_identifier = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_as::<_, User>(query)
        .bind(account_identifier)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by account identifier")
}

pub(crate) async fn lookup_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let query = r"
        SELECT id, name, account_identifier, email, password_hash, created_at
        FROM users WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    sqlx::query_as::<_, User>(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    name: &str,
    account_identifier: &str,
    email: &str,
    password_hash: &str,
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users (id, name, account_identifier, email, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, account_identifier, email, password_hash, created_at
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query_as::<_, User>(query)
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(account_identifier)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(user) => Ok(SignupOutcome::Created(user)),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}
