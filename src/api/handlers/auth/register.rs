//! Account registration endpoint.

use axum::{extract::Extension, http::StatusCode, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::error::ApiError;
use crate::password;

use super::state::AuthState;
use super::storage::{insert_user, lookup_by_account, lookup_by_email, SignupOutcome};
use super::types::{RegisterRequest, RegisterResponse};
use super::utils::{
    generate_account_identifier, normalize_email, valid_email, valid_name, valid_password,
    MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

// Collisions on a 10-digit identifier are rare; a handful of retries is plenty.
const MAX_IDENTIFIER_ATTEMPTS: usize = 10;

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid or missing fields"),
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(ApiError::Validation("Missing payload".to_string())),
    };

    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    if !valid_name(&name) {
        return Err(ApiError::Validation(format!(
            "Name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    if !valid_email(&email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if !valid_password(&request.password) {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if lookup_by_email(&pool, &email).await?.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let account_identifier = pick_account_identifier(&pool).await?;

    // bcrypt is CPU-bound; keep it off the async runtime threads.
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let user = match insert_user(&pool, &name, &account_identifier, &email, &password_hash).await? {
        SignupOutcome::Created(user) => user,
        // Unique violation on email between the pre-check and the insert.
        SignupOutcome::Conflict => {
            return Err(ApiError::Validation("Email already registered".to_string()))
        }
    };

    info!(account_identifier = %user.account_identifier, "Account created");

    // Welcome email is best-effort and must not delay the response.
    let mailer = auth_state.mailer().clone();
    let welcome_email = user.email.clone();
    let welcome_name = user.name.clone();
    let welcome_account = user.account_identifier.clone();
    tokio::spawn(async move {
        if let Err(err) = mailer.send_welcome(&welcome_email, &welcome_name, &welcome_account) {
            error!("Failed to send welcome email: {err}");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            account_identifier: user.account_identifier,
        }),
    ))
}

async fn pick_account_identifier(pool: &PgPool) -> Result<String, ApiError> {
    for _ in 0..MAX_IDENTIFIER_ATTEMPTS {
        let candidate = generate_account_identifier();
        if lookup_by_account(pool, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(ApiError::Internal(anyhow::anyhow!(
        "Exhausted account identifier attempts"
    )))
}
