//! Book endpoints

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookPayload},
        user::UserClaims,
    },
    services::query::BookQuery,
    AppState,
};

use super::{ApiJson, ApiPath};

/// Reads the raw query string as a string map; repeated keys keep the last value
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BookQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(BookQuery::from_params(&params))
    }
}

/// List books with exact filters, search and ordering
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(
        ("title" = Option<String>, Query, description = "Exact title"),
        ("author__name" = Option<String>, Query, description = "Exact author name"),
        ("publication_year" = Option<String>, Query, description = "Exact publication year"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on title or author name"),
        ("ordering" = Option<String>, Query, description = "Comma-separated: title, -title, publication_year, -publication_year")
    ),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>, query: BookQuery) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create_book(payload, &claims).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_book(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.replace_book(id, payload, &claims).await?;
    Ok(Json(book))
}

/// Partially update a book
#[utoipa::path(
    patch,
    path = "/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_book(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.patch_book(id, payload, &claims).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
