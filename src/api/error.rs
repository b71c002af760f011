//! API error taxonomy and response mapping.
//!
//! Validation and authentication failures are expected control flow and map
//! directly to their status codes. Authentication rejections carry a fixed,
//! undifferentiated message so callers cannot distinguish "no such account"
//! from "wrong password" or "wrong code". Rate limiting is a distinct 429 so
//! clients can back off correctly. Internal failures are logged with full
//! detail server-side and cross the boundary as a generic message; raw
//! database errors never reach the client.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. 400.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, or an invalid/expired OTP or token. 401 with a
    /// deliberately undifferentiated message.
    #[error("{0}")]
    Authentication(&'static str),

    /// Referenced resource does not exist. 404.
    #[error("{0}")]
    NotFound(&'static str),

    /// OTP issuance threshold reached. 429, distinct from authentication
    /// failures.
    #[error("Too many OTP requests. Please try again later.")]
    RateLimited,

    /// Synchronous delivery failure (resend only; login swallows these).
    #[error("Failed to send OTP email. Please try again.")]
    Delivery,

    /// Persistence or configuration failure. 500, generic message to the
    /// caller, detail logged server-side.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Delivery | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref source) = self {
            error!("internal error: {source:?}");
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Authentication("nope").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("gone").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Delivery.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_message_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.5:5432"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn rate_limited_message_mentions_backoff() {
        assert!(ApiError::RateLimited.to_string().contains("try again later"));
    }
}
