//! Bearer-token extraction for protected routes.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::api::error::ApiError;
use crate::token::SessionClaims;

use super::state::AuthState;

/// Resolve the `Authorization: Bearer` header into verified session claims.
///
/// # Errors
///
/// Returns 401 when the header is missing or malformed, and 401 when the
/// token fails signature or expiry checks.
pub fn require_session(headers: &HeaderMap, auth_state: &AuthState) -> Result<SessionClaims, ApiError> {
    let token = extract_bearer_token(headers).ok_or(ApiError::Authentication("Token is missing"))?;

    auth_state
        .tokens()
        .verify(token)
        .ok_or(ApiError::Authentication("Token is invalid or expired"))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("ascii"));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn accepts_lowercase_scheme() {
        let headers = headers_with("bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(extract_bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("abc.def.ghi")), None);
    }
}
