//! Read-open / write-authenticated access policy for catalog routes

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use super::bearer_claims;
use crate::{error::AppError, models::user::UserClaims, AppState};

/// Safe methods are open to everyone; anything else needs a principal.
pub fn is_allowed(method: &Method, principal: Option<&UserClaims>) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) || principal.is_some()
}

/// Resolve the bearer token (if any), apply [`is_allowed`] and hand the
/// claims to the write handlers through request extensions.
///
/// Runs before any extractor, so a rejected write never reaches body parsing
/// or the store.
pub async fn enforce_access_policy(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = bearer_claims(request.headers(), &state.config.auth.jwt_secret);

    if !is_allowed(request.method(), principal.as_ref()) {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected unauthenticated write"
        );
        return Err(AppError::Authentication(
            "Authentication credentials were not provided.".to_string(),
        ));
    }

    if let Some(claims) = principal {
        request.extensions_mut().insert(claims);
    }
    Ok(next.run(request).await)
}
