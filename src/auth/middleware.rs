// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::token::TokenService;
use crate::error::ApiError;

/// Identity resolved by the auth gate for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

/// Pull the raw token out of the Authorization header
///
/// Accepts a bare token or the `Bearer <token>` form.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization token".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?
        .trim();

    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => value,
    };
    if token.is_empty() {
        return Err(ApiError::Unauthorized("Missing authorization token".to_string()));
    }

    Ok(token)
}

/// Auth gate: verifies the token and attaches the caller's identity
///
/// Stateless per request; nothing about a verification is cached.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let endpoint = request.uri().path().to_string();

    let user_id = {
        let token = extract_token(request.headers()).map_err(|e| {
            warn!("Missing authorization token for endpoint: {}", endpoint);
            e
        })?;

        tokens.verify(token).map_err(|e| {
            warn!("Token rejected for endpoint {}: {}", endpoint, e);
            ApiError::from(e)
        })?
    };

    debug!(user_id, endpoint = %endpoint, "Request authenticated");
    request.extensions_mut().insert(AuthenticatedUser { user_id });
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization token".to_string()))
    }
}
