//! Author endpoints

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf_server::models::Role;

use crate::common::{catalog_app, spawn_app, strings};

#[tokio::test]
async fn test_list_authors_with_nested_books() {
    let app = catalog_app().await;
    let (status, body) = app.get("/authors/").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Evelyn Waugh", "George Orwell", "J.R.R. Tolkien", "Stephen King"]);

    let king = body.as_array().unwrap().iter().find(|a| a["name"] == "Stephen King").unwrap();
    let titles: Vec<&str> = king["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["The Shining", "It", "Misery"]);
}

#[tokio::test]
async fn test_author_writes_need_authentication() {
    let app = catalog_app().await;
    let king = app.author_id("Stephen King").await;

    let (status, _) = app
        .request(Method::POST, "/authors/", None, Some(json!({"name": "Anonymous"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::DELETE, &format!("/authors/{}/", king), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.book_count().await, 7);
}

#[tokio::test]
async fn test_create_update_author() {
    let app = spawn_app().await;
    let token = app.token(Role::Member);

    let (status, created) = app
        .request(Method::POST, "/authors/", Some(&token), Some(json!({"name": " Ursula K. Le Guin "})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Ursula K. Le Guin");
    assert_eq!(created["books"], json!([]));

    let uri = format!("/authors/{}/", created["id"]);
    let (status, patched) = app
        .request(Method::PATCH, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "Ursula K. Le Guin");

    let (status, body) = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["This field is required."]));

    let (status, replaced) = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({"name": "U. K. Le Guin"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "U. K. Le Guin");
}

#[tokio::test]
async fn test_author_name_rules() {
    let app = spawn_app().await;
    let token = app.token(Role::Member);

    let (status, body) = app
        .request(Method::POST, "/authors/", Some(&token), Some(json!({"name": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["This field may not be blank."]));

    let (status, body) = app
        .request(Method::POST, "/authors/", Some(&token), Some(json!({"name": "n".repeat(101)})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["name"], json!(["Ensure this field has no more than 100 characters."]));
}

#[tokio::test]
async fn test_deleting_author_removes_their_books() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;
    let misery = app.book_id("Misery").await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/authors/{}/", king), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/authors/{}/", king)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/books/{}/", misery)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(app.titles("?search=King").await.is_empty());
    assert_eq!(
        app.titles("").await,
        strings(&["The Hobbit", "Animal Farm", "Brideshead Revisited", "1984"])
    );
}

#[tokio::test]
async fn test_missing_author_is_404() {
    let app = spawn_app().await;
    let token = app.token(Role::Admin);

    let (status, _) = app.get("/authors/12/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .request(Method::DELETE, "/authors/12/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
