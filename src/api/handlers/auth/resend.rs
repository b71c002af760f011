//! OTP re-issue endpoint.

use axum::{extract::Extension, Json};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};
use ulid::Ulid;

use crate::api::error::ApiError;
use crate::otp::OtpLedger;

use super::state::AuthState;
use super::storage::lookup_by_account;
use super::types::{OtpSentResponse, ResendOtpRequest};

#[utoipa::path(
    post,
    path = "/resend-otp",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Fresh OTP dispatched", body = OtpSentResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Unknown account identifier"),
        (status = 429, description = "OTP request limit reached"),
        (status = 500, description = "Delivery failed"),
    ),
    tag = "auth"
)]
pub async fn resend_otp(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResendOtpRequest>>,
) -> Result<Json<OtpSentResponse>, ApiError> {
    let request: ResendOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(ApiError::Validation("Missing payload".to_string())),
    };

    let account_identifier = request.account_identifier.trim().to_string();
    if account_identifier.is_empty() {
        return Err(ApiError::Validation(
            "Account identifier is required".to_string(),
        ));
    }

    let user = match lookup_by_account(&pool, &account_identifier).await? {
        Some(user) => user,
        None => return Err(ApiError::Authentication("Invalid account identifier")),
    };

    let config = auth_state.config();
    let recent = OtpLedger::count_recent(&pool, user.id, config.rate_limit_window()).await?;
    if recent >= config.rate_limit_max_per_window() {
        return Err(ApiError::RateLimited);
    }

    // Resends use a shorter validity window than the login-issued code.
    let code = auth_state
        .generator()
        .generate(user.id, Utc::now(), &Ulid::new().to_string());
    let issued = OtpLedger::issue(&pool, user.id, &code, config.resend_otp_ttl()).await?;

    // Unlike login, delivery is awaited: the caller explicitly asked for a
    // new code, so a transport failure is surfaced as a 500.
    if let Err(err) = auth_state.mailer().send_otp(&user.email, &code) {
        error!("Failed to resend OTP email: {err}");
        return Err(ApiError::Delivery);
    }

    info!(
        account_identifier = %user.account_identifier,
        expires_at = %issued.expires_at,
        "OTP re-issued"
    );

    Ok(Json(OtpSentResponse {
        status: "otp_sent".to_string(),
        message: "New OTP has been sent".to_string(),
        expiry_minutes: None,
        debug_otp: config.debug_otp().then_some(code),
    }))
}
