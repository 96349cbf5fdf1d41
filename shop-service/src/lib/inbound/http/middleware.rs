use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and adds the user to request extensions.
///
/// Every rejection produces the same 401 response; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let subject = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = %e, "Bearer token rejected");
        ApiError::Unauthorized
    })?;

    let user_id = UserId::from_string(&subject).map_err(|e| {
        tracing::warn!(reason = %e, "Bearer token subject is not a user id");
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            ApiError::Unauthorized
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid ASCII");
        ApiError::Unauthorized
    })?;

    // Auth scheme names are case-insensitive (RFC 7235)
    auth_str
        .trim()
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Authorization header is not a bearer token");
            ApiError::Unauthorized
        })
}
