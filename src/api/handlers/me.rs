//! Authenticated self-service endpoint.

use axum::{
    extract::Extension,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::error::ApiError;

use super::auth::guard::require_session;
use super::auth::storage::{lookup_by_account, PublicUser};
use super::auth::AuthState;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[utoipa::path(
    get,
    path = "/protected/me",
    responses(
        (status = 200, description = "Authenticated user profile", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Token subject no longer exists"),
    ),
    security(("bearer_token" = [])),
    tag = "me"
)]
pub async fn get_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<MeResponse>, ApiError> {
    let claims = require_session(&headers, &auth_state)?;

    // Re-resolve the subject on every request; a valid token for a deleted
    // user must not fabricate a profile.
    let user = match lookup_by_account(&pool, &claims.account_identifier).await? {
        Some(user) => user,
        None => return Err(ApiError::NotFound("User not found")),
    };

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
    }))
}
