//! Librarian endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        librarian::{Librarian, LibrarianPayload},
        user::Permission,
    },
    AppState,
};

use super::{ApiJson, ApiPath, AuthenticatedUser};

/// List librarians
#[utoipa::path(
    get,
    path = "/librarians/",
    tag = "librarians",
    responses(
        (status = 200, description = "Librarians ordered by name", body = Vec<Librarian>)
    )
)]
pub async fn list_librarians(State(state): State<AppState>) -> AppResult<Json<Vec<Librarian>>> {
    let librarians = state.services.libraries.list_librarians().await?;
    Ok(Json(librarians))
}

/// Get librarian by ID
#[utoipa::path(
    get,
    path = "/librarians/{id}/",
    tag = "librarians",
    params(("id" = i64, Path, description = "Librarian ID")),
    responses(
        (status = 200, description = "Librarian details", body = Librarian),
        (status = 404, description = "Librarian not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_librarian(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Librarian>> {
    let librarian = state.services.libraries.get_librarian(id).await?;
    Ok(Json(librarian))
}

/// Assign a librarian to a library
#[utoipa::path(
    post,
    path = "/librarians/",
    tag = "librarians",
    security(("bearer_auth" = [])),
    request_body = LibrarianPayload,
    responses(
        (status = 201, description = "Librarian created", body = Librarian),
        (status = 400, description = "Invalid fields or library already staffed"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(payload): ApiJson<LibrarianPayload>,
) -> AppResult<(StatusCode, Json<Librarian>)> {
    claims.require(Permission::CanCreate)?;
    let librarian = state.services.libraries.create_librarian(payload, &claims).await?;
    Ok((StatusCode::CREATED, Json(librarian)))
}

/// Replace a librarian
#[utoipa::path(
    put,
    path = "/librarians/{id}/",
    tag = "librarians",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Librarian ID")),
    request_body = LibrarianPayload,
    responses(
        (status = 200, description = "Librarian replaced", body = Librarian),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Librarian not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LibrarianPayload>,
) -> AppResult<Json<Librarian>> {
    claims.require(Permission::CanEdit)?;
    let librarian = state.services.libraries.update_librarian(id, payload, false, &claims).await?;
    Ok(Json(librarian))
}

/// Partially update a librarian
#[utoipa::path(
    patch,
    path = "/librarians/{id}/",
    tag = "librarians",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Librarian ID")),
    request_body = LibrarianPayload,
    responses(
        (status = 200, description = "Librarian updated", body = Librarian),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Librarian not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<LibrarianPayload>,
) -> AppResult<Json<Librarian>> {
    claims.require(Permission::CanEdit)?;
    let librarian = state.services.libraries.update_librarian(id, payload, true, &claims).await?;
    Ok(Json(librarian))
}

/// Delete a librarian
#[utoipa::path(
    delete,
    path = "/librarians/{id}/",
    tag = "librarians",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Librarian ID")),
    responses(
        (status = 204, description = "Librarian deleted"),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Librarian not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_librarian(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    claims.require(Permission::CanDelete)?;
    state.services.libraries.delete_librarian(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
