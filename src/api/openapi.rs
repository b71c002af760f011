//! `OpenAPI` document for the HTTP surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{auth, health, me};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register::register,
        auth::login::login,
        auth::verify::verify_otp,
        auth::resend::resend_otp,
        me::get_me,
    ),
    components(schemas(
        health::Health,
        auth::types::RegisterRequest,
        auth::types::RegisterResponse,
        auth::types::LoginRequest,
        auth::types::OtpSentResponse,
        auth::types::VerifyOtpRequest,
        auth::types::VerifyOtpResponse,
        auth::types::ResendOtpRequest,
        auth::storage::PublicUser,
        me::MeResponse,
    )),
    modifiers(&BearerToken),
    tags(
        (name = "auth", description = "Password + OTP two-factor login"),
        (name = "me", description = "Routes requiring a session token"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct BearerToken;

impl Modify for BearerToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for route in [
            "/health",
            "/register",
            "/login",
            "/verify-otp",
            "/resend-otp",
            "/protected/me",
        ] {
            assert!(paths.contains(&route), "missing route {route}");
        }
    }

    #[test]
    fn document_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_token"));
    }
}
