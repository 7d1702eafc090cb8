//! API handlers for Bookshelf REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod librarians;
pub mod libraries;
pub mod openapi;
pub mod policy;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// JSON body extractor whose rejections render as [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Raw token of an `Authorization: Bearer ...` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Claims of a valid bearer token; missing, malformed or expired tokens
/// resolve to no principal
pub fn bearer_claims(headers: &HeaderMap, secret: &str) -> Option<UserClaims> {
    let token = bearer_token(headers)?;
    match UserClaims::from_token(token, secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring invalid bearer token: {}", e);
            None
        }
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    // Books and authors: reads are open, writes go through the access policy
    let catalog = Router::new()
        .route("/books/", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id/",
            get(books::get_book)
                .put(books::replace_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        .route("/authors/", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id/",
            get(authors::get_author)
                .put(authors::replace_author)
                .patch(authors::patch_author)
                .delete(authors::delete_author),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            policy::enforce_access_policy,
        ));

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/users/:id/role", put(auth::update_role))
        // Libraries
        .route("/libraries/", get(libraries::list_libraries).post(libraries::create_library))
        .route(
            "/libraries/:id/",
            get(libraries::get_library)
                .put(libraries::replace_library)
                .patch(libraries::patch_library)
                .delete(libraries::delete_library),
        )
        .route("/libraries/:id/books/", post(libraries::add_books))
        .route("/libraries/:id/books/:book_id/", delete(libraries::remove_book))
        .route("/libraries/:id/librarian/", get(libraries::get_librarian))
        // Librarians
        .route("/librarians/", get(librarians::list_librarians).post(librarians::create_librarian))
        .route(
            "/librarians/:id/",
            get(librarians::get_librarian)
                .put(librarians::replace_librarian)
                .patch(librarians::patch_librarian)
                .delete(librarians::delete_librarian),
        )
        .merge(catalog)
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
}
