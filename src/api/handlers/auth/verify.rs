//! Second authentication factor: OTP presentation and session issuance.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::api::error::ApiError;
use crate::otp::OtpLedger;

use super::state::AuthState;
use super::storage::{lookup_by_account, PublicUser};
use super::types::{VerifyOtpRequest, VerifyOtpResponse};
use super::utils::valid_otp_format;

/// Unknown account, wrong code, expired code, and replayed code all collapse
/// into this one message.
const INVALID_OTP: &str = "Invalid or expired OTP";

#[utoipa::path(
    post,
    path = "/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP accepted, session token issued", body = VerifyOtpResponse),
        (status = 400, description = "Malformed OTP or missing fields"),
        (status = 401, description = "Invalid, expired, or already-used OTP"),
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    let request: VerifyOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return Err(ApiError::Validation("Missing payload".to_string())),
    };

    let account_identifier = request.account_identifier.trim().to_string();
    let code = request.otp.trim().to_string();
    if account_identifier.is_empty() || code.is_empty() {
        return Err(ApiError::Validation(
            "Account identifier and OTP are required".to_string(),
        ));
    }
    // Malformed codes are rejected before touching the ledger.
    if !valid_otp_format(&code) {
        return Err(ApiError::Validation("OTP must be 6 digits".to_string()));
    }

    let user = match lookup_by_account(&pool, &account_identifier).await? {
        Some(user) => user,
        // Same 401 as a wrong code, so the response does not confirm
        // whether the account exists.
        None => return Err(ApiError::Authentication(INVALID_OTP)),
    };

    if !OtpLedger::consume(&pool, user.id, &code).await? {
        return Err(ApiError::Authentication(INVALID_OTP));
    }

    let token = auth_state
        .tokens()
        .issue(user.id, &user.account_identifier)?;

    info!(account_identifier = %user.account_identifier, "Session issued");

    Ok(Json(VerifyOtpResponse {
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}
