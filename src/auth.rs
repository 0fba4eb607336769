//! Identity boundary.
//!
//! Token verification is an external collaborator; this service only needs a
//! stable owner subject per call. Two tiers:
//!
//! - mock (default): any `Authorization: Bearer …` maps to the configured
//!   subject, so local development needs no identity provider at all;
//! - gateway: a fronting proxy that has already verified the token forwards
//!   the subject in `X-Auth-Sub`, which is trusted as-is.
//!
//! The subject is an opaque scoping key; nothing here inspects its structure.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::http::AppState;

#[derive(Debug, Clone)]
pub struct Identity {
    pub sub: String,
}

impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(sub) = parts
            .headers
            .get("x-auth-sub")
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
        {
            return Ok(Identity {
                sub: sub.to_string(),
            });
        }

        let auth = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if auth.len() > 7 && auth[..7].eq_ignore_ascii_case("bearer ") {
            return Ok(Identity {
                sub: state.settings.auth_mock_sub.clone(),
            });
        }

        Err(AppError::Unauthorized("Missing bearer token".to_string()))
    }
}
