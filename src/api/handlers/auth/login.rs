//! First authentication factor: password check plus OTP dispatch.

use axum::{extract::Extension, Json};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};
use ulid::Ulid;

use crate::api::error::ApiError;
use crate::otp::OtpLedger;
use crate::password;

use super::state::AuthState;
use super::storage::lookup_by_account;
use super::types::{LoginRequest, OtpSentResponse};
use super::utils::valid_account_identifier;

/// One message for a bad identifier and for a bad password, so responses do
/// not reveal which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid account identifier or password";

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted, OTP dispatched", body = OtpSentResponse),
        (status = 400, description = "Invalid or missing fields"),
        (status = 401, description = "Unknown account or wrong password"),
        (status = 429, description = "OTP request limit reached"),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<OtpSentResponse>, ApiError> {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(ApiError::Validation("Missing payload".to_string())),
    };

    let account_identifier = request.account_identifier.trim().to_string();
    if account_identifier.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Account identifier and password are required".to_string(),
        ));
    }
    if !valid_account_identifier(&account_identifier) {
        // Shape failures get the same 401 as unknown accounts.
        return Err(ApiError::Authentication(INVALID_CREDENTIALS));
    }

    let user = match lookup_by_account(&pool, &account_identifier).await? {
        Some(user) => user,
        None => return Err(ApiError::Authentication(INVALID_CREDENTIALS)),
    };

    let password_hash = user.password_hash.clone();
    let candidate = request.password;
    let verified = tokio::task::spawn_blocking(move || password::verify(&candidate, &password_hash))
        .await
        .map_err(anyhow::Error::from)?;
    if !verified {
        return Err(ApiError::Authentication(INVALID_CREDENTIALS));
    }

    let config = auth_state.config();
    let recent = OtpLedger::count_recent(&pool, user.id, config.rate_limit_window()).await?;
    if recent >= config.rate_limit_max_per_window() {
        return Err(ApiError::RateLimited);
    }

    let code = auth_state
        .generator()
        .generate(user.id, Utc::now(), &Ulid::new().to_string());
    let issued = OtpLedger::issue(&pool, user.id, &code, config.login_otp_ttl()).await?;

    info!(
        account_identifier = %user.account_identifier,
        expires_at = %issued.expires_at,
        "OTP issued for login"
    );

    // Delivery is fire-and-forget: the code is committed, so a transport
    // failure must not fail the login response.
    let mailer = auth_state.mailer().clone();
    let to_email = user.email.clone();
    let to_code = code.clone();
    tokio::spawn(async move {
        if let Err(err) = mailer.send_otp(&to_email, &to_code) {
            error!("Failed to send OTP email: {err}");
        }
    });

    let expiry_minutes = config.login_otp_ttl().as_secs() / 60;
    Ok(Json(OtpSentResponse {
        status: "otp_sent".to_string(),
        message: "OTP has been sent to your registered email address".to_string(),
        expiry_minutes: Some(expiry_minutes),
        debug_otp: config.debug_otp().then_some(code),
    }))
}
