//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, librarians, libraries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.3.0",
        description = "Library catalog REST API: books, authors, libraries and librarians",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::update_role,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::replace_book,
        books::patch_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::replace_author,
        authors::patch_author,
        authors::delete_author,
        // Libraries
        libraries::list_libraries,
        libraries::get_library,
        libraries::create_library,
        libraries::replace_library,
        libraries::patch_library,
        libraries::delete_library,
        libraries::add_books,
        libraries::remove_book,
        libraries::get_librarian,
        // Librarians
        librarians::list_librarians,
        librarians::get_librarian,
        librarians::create_librarian,
        librarians::replace_librarian,
        librarians::patch_librarian,
        librarians::delete_librarian,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateRole,
            crate::models::user::Role,
            crate::models::user::Permission,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookPayload,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorPayload,
            // Libraries
            crate::models::library::Library,
            crate::models::library::LibraryDetail,
            crate::models::library::LibraryPayload,
            crate::models::library::LibraryBooksPayload,
            crate::models::librarian::Librarian,
            crate::models::librarian::LibrarianPayload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and accounts"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Authors and their books"),
        (name = "libraries", description = "Libraries and holdings"),
        (name = "librarians", description = "Library staff")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by write endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
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

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
