//! Author endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorPayload},
        user::UserClaims,
    },
    AppState,
};

use super::{ApiJson, ApiPath};

/// List authors with their books
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "authors",
    responses(
        (status = 200, description = "Authors ordered by name", body = Vec<AuthorDetail>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorDetail>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}/",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = AuthorDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiJson(payload): ApiJson<AuthorPayload>,
) -> AppResult<(StatusCode, Json<AuthorDetail>)> {
    let author = state.services.catalog.create_author(payload, &claims).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author replaced", body = AuthorDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_author(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AuthorPayload>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.update_author(id, payload, false, &claims).await?;
    Ok(Json(author))
}

/// Partially update an author
#[utoipa::path(
    patch,
    path = "/authors/{id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = AuthorDetail),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_author(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AuthorPayload>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.update_author(id, payload, true, &claims).await?;
    Ok(Json(author))
}

/// Delete an author and all of their books
#[utoipa::path(
    delete,
    path = "/authors/{id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author and books deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_author(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
