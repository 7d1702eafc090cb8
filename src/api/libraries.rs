//! Library endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        librarian::Librarian,
        library::{Library, LibraryBooksPayload, LibraryDetail, LibraryPayload},
        user::Permission,
    },
    AppState,
};

use super::{ApiJson, ApiPath, AuthenticatedUser};

/// List libraries
#[utoipa::path(
    get,
    path = "/libraries/",
    tag = "libraries",
    responses(
        (status = 200, description = "Libraries ordered by name", body = Vec<Library>)
    )
)]
pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.libraries.list_libraries().await?;
    Ok(Json(libraries))
}

/// Get library with holdings and librarian
#[utoipa::path(
    get,
    path = "/libraries/{id}/",
    tag = "libraries",
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = LibraryDetail),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<LibraryDetail>> {
    let library = state.services.libraries.get_library(id).await?;
    Ok(Json(library))
}

/// Create a library
#[utoipa::path(
    post,
    path = "/libraries/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    request_body = LibraryPayload,
    responses(
        (status = 201, description = "Library created", body = LibraryDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(payload): ApiJson<LibraryPayload>,
) -> AppResult<(StatusCode, Json<LibraryDetail>)> {
    claims.require(Permission::CanCreate)?;
    let library = state.services.libraries.create_library(payload, &claims).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Replace a library
#[utoipa::path(
    put,
    path = "/libraries/{id}/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    request_body = LibraryPayload,
    responses(
        (status = 200, description = "Library replaced", body = LibraryDetail),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LibraryPayload>,
) -> AppResult<Json<LibraryDetail>> {
    claims.require(Permission::CanEdit)?;
    let library = state.services.libraries.update_library(id, payload, false, &claims).await?;
    Ok(Json(library))
}

/// Partially update a library
#[utoipa::path(
    patch,
    path = "/libraries/{id}/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    request_body = LibraryPayload,
    responses(
        (status = 200, description = "Library updated", body = LibraryDetail),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LibraryPayload>,
) -> AppResult<Json<LibraryDetail>> {
    claims.require(Permission::CanEdit)?;
    let library = state.services.libraries.update_library(id, payload, true, &claims).await?;
    Ok(Json(library))
}

/// Delete a library (its books are kept)
#[utoipa::path(
    delete,
    path = "/libraries/{id}/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 204, description = "Library deleted"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    claims.require(Permission::CanDelete)?;
    state.services.libraries.delete_library(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add existing books to a library
#[utoipa::path(
    post,
    path = "/libraries/{id}/books/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Library ID")),
    request_body = LibraryBooksPayload,
    responses(
        (status = 200, description = "Updated library", body = LibraryDetail),
        (status = 400, description = "Unknown book id"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LibraryBooksPayload>,
) -> AppResult<Json<LibraryDetail>> {
    claims.require(Permission::CanEdit)?;
    let ids = payload.into_ids()?;
    let library = state.services.libraries.add_books(id, &ids, &claims).await?;
    Ok(Json(library))
}

/// Remove a book from a library
#[utoipa::path(
    delete,
    path = "/libraries/{id}/books/{book_id}/",
    tag = "libraries",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Library ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book removed from library"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Library or holding not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath((id, book_id)): ApiPath<(i64, i64)>,
) -> AppResult<StatusCode> {
    claims.require(Permission::CanEdit)?;
    state.services.libraries.remove_book(id, book_id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Librarian in charge of a library
#[utoipa::path(
    get,
    path = "/libraries/{id}/librarian/",
    tag = "libraries",
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Librarian", body = Librarian),
        (status = 404, description = "Library not found or unstaffed", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_librarian(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Librarian>> {
    let librarian = state.services.libraries.librarian_for_library(id).await?;
    Ok(Json(librarian))
}
