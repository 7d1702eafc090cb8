//! Registration, login and account management

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf_server::models::Role;

use crate::common::{spawn_app, TestApp};

async fn register(app: &TestApp, login: &str) -> i64 {
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"login": login, "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn login(app: &TestApp, login: &str, password: &str) -> (StatusCode, serde_json::Value) {
    app.request(
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"login": login, "password": password})),
    )
    .await
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_register_login_and_write() {
    let app = spawn_app().await;
    register(&app, "reader").await;

    let (status, body) = login(&app, "reader", "correct horse").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.request(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["login"], "reader");
    assert_eq!(me["role"], "member");
    assert_eq!(me["permissions"], json!(["can_view"]));

    let (status, _) = app
        .request(Method::POST, "/authors/", Some(&token), Some(json!({"name": "Octavia E. Butler"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_is_case_insensitive_but_password_is_not() {
    let app = spawn_app().await;
    register(&app, "Reader").await;

    let (status, _) = login(&app, "READER", "correct horse").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(&app, "reader", "Correct Horse").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not_authenticated");

    let (status, _) = login(&app, "nobody", "correct horse").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_login_conflicts() {
    let app = spawn_app().await;
    register(&app, "reader").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"login": "READER", "password": "another password"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"login": "ab", "password": "short"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["login"].is_array());
    assert!(body["password"].is_array());
}

#[tokio::test]
async fn test_login_length_counts_after_trimming() {
    let app = spawn_app().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"login": "  ab  ", "password": "correct horse"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["login"].is_array());

    let id = register(&app, "  abc  ").await;
    let (status, _) = login(&app, "abc", "correct horse").await;
    assert_eq!(status, StatusCode::OK);
    assert!(id > 0);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = spawn_app().await;
    let (status, _) = app.get("/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_admin_changes_roles() {
    let app = spawn_app().await;
    let id = register(&app, "promotable").await;
    let uri = format!("/users/{}/role", id);

    let librarian = app.token(Role::Librarian);
    let (status, _) = app
        .request(Method::PUT, &uri, Some(&librarian), Some(json!({"role": "admin"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.token(Role::Admin);
    let (status, body) = app
        .request(Method::PUT, &uri, Some(&admin), Some(json!({"role": "librarian"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "librarian");
    assert_eq!(body["permissions"], json!(["can_view", "can_create", "can_edit"]));

    let (status, _) = app
        .request(Method::PUT, "/users/999/role", Some(&admin), Some(json!({"role": "member"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bootstrap_admin_can_log_in() {
    let app = spawn_app().await;
    let mut auth = app.state.config.auth.clone();
    auth.admin_login = Some("root".to_string());
    auth.admin_password = Some("bootstrap-secret".to_string());

    let users = bookshelf_server::services::users::UsersService::new(app.repository.clone(), auth);
    users.ensure_admin().await.unwrap();
    users.ensure_admin().await.unwrap();

    let (token, user) = users.authenticate("root", "bootstrap-secret").await.unwrap();
    assert_eq!(user.role, Role::Admin);
    assert!(!token.is_empty());
}
