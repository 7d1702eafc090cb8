//! Book listing pipeline, access policy and write validation

use axum::http::{Method, StatusCode};
use serde_json::json;

use bookshelf_server::models::{book::current_year, Role};

use crate::common::{catalog_app, spawn_app, strings};

const DEFAULT_ORDER: &[&str] = &[
    "The Hobbit",
    "Animal Farm",
    "Brideshead Revisited",
    "1984",
    "The Shining",
    "It",
    "Misery",
];

// =========================================================================
// LISTING
// =========================================================================

#[tokio::test]
async fn test_list_without_params_uses_default_order() {
    let app = catalog_app().await;
    assert_eq!(app.titles("").await, strings(DEFAULT_ORDER));
}

#[tokio::test]
async fn test_list_is_a_bare_array_of_books() {
    let app = catalog_app().await;
    let king = app.author_id("Stephen King").await;

    let (status, body) = app.get("/books/?title=Misery").await;
    assert_eq!(status, StatusCode::OK);
    let book = &body.as_array().unwrap()[0];
    assert_eq!(book["title"], "Misery");
    assert_eq!(book["publication_year"], 1987);
    assert_eq!(book["author"], king);
    assert!(book["id"].is_i64());
}

#[tokio::test]
async fn test_ordering_by_title() {
    let app = catalog_app().await;

    let ascending = app.titles("?ordering=title").await;
    assert_eq!(
        ascending,
        strings(&["1984", "Animal Farm", "Brideshead Revisited", "It", "Misery", "The Hobbit", "The Shining"])
    );

    let mut descending = app.titles("?ordering=-title").await;
    descending.reverse();
    assert_eq!(descending, ascending);
}

#[tokio::test]
async fn test_ordering_by_year_descending() {
    let app = catalog_app().await;
    let titles = app.titles("?ordering=-publication_year").await;
    assert_eq!(titles.first().map(String::as_str), Some("Misery"));
    assert_eq!(titles.last().map(String::as_str), Some("The Hobbit"));
}

#[tokio::test]
async fn test_ordering_multiple_keys_breaks_ties() {
    let app = catalog_app().await;

    let titles = app.titles("?ordering=publication_year,-title").await;
    assert_eq!(titles[1..3], strings(&["Brideshead Revisited", "Animal Farm"]));

    let titles = app.titles("?ordering=publication_year,title").await;
    assert_eq!(titles, strings(DEFAULT_ORDER));
}

#[tokio::test]
async fn test_unknown_ordering_falls_back_to_default() {
    let app = catalog_app().await;
    assert_eq!(app.titles("?ordering=price").await, strings(DEFAULT_ORDER));
    assert_eq!(app.titles("?ordering=author__name,-title").await.first().map(String::as_str), Some("The Shining"));
}

#[tokio::test]
async fn test_search_matches_author_name_case_insensitively() {
    let app = catalog_app().await;
    let expected = strings(&["The Shining", "It", "Misery"]);

    assert_eq!(app.titles("?search=King").await, expected);
    assert_eq!(app.titles("?search=king").await, expected);
    assert_eq!(app.titles("?search=KING").await, expected);
}

#[tokio::test]
async fn test_search_matches_title_substring() {
    let app = catalog_app().await;
    assert_eq!(app.titles("?search=farm").await, strings(&["Animal Farm"]));
}

#[tokio::test]
async fn test_empty_search_returns_everything() {
    let app = catalog_app().await;
    assert_eq!(app.titles("?search=").await, strings(DEFAULT_ORDER));
    assert_eq!(app.titles("?search=%20%20").await, strings(DEFAULT_ORDER));
}

#[tokio::test]
async fn test_exact_filters() {
    let app = catalog_app().await;

    assert_eq!(app.titles("?title=It").await, strings(&["It"]));
    assert!(app.titles("?title=it").await.is_empty());
    assert_eq!(
        app.titles("?author__name=George%20Orwell").await,
        strings(&["Animal Farm", "1984"])
    );
    assert_eq!(
        app.titles("?publication_year=1945").await,
        strings(&["Animal Farm", "Brideshead Revisited"])
    );
}

#[tokio::test]
async fn test_filters_search_and_ordering_compose() {
    let app = catalog_app().await;
    let titles = app
        .titles("?author__name=Stephen%20King&search=i&ordering=-publication_year")
        .await;
    assert_eq!(titles, strings(&["Misery", "It", "The Shining"]));
}

#[tokio::test]
async fn test_unknown_author_is_empty_not_error() {
    let app = catalog_app().await;
    let (status, body) = app.get("/books/?author__name=Nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_non_numeric_year_filter_is_empty_not_error() {
    let app = catalog_app().await;
    let (status, body) = app.get("/books/?publication_year=nineteen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_missing_book_is_404() {
    let app = spawn_app().await;
    let (status, body) = app.get("/books/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// =========================================================================
// ACCESS POLICY
// =========================================================================

#[tokio::test]
async fn test_unauthenticated_writes_are_rejected_and_change_nothing() {
    let app = catalog_app().await;
    let king = app.author_id("Stephen King").await;
    let misery = app.book_id("Misery").await;
    let before = app.titles("").await;

    let payload = json!({"title": "Carrie", "publication_year": 1974, "author": king});
    let attempts = [
        (Method::POST, "/books/".to_string(), Some(payload.clone())),
        (Method::PUT, format!("/books/{}/", misery), Some(payload.clone())),
        (Method::PATCH, format!("/books/{}/", misery), Some(json!({"title": "Changed"}))),
        (Method::DELETE, format!("/books/{}/", misery), None),
    ];
    for (method, uri, body) in attempts {
        let (status, response) = app.request(method.clone(), &uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response["error"], "not_authenticated");
    }

    assert_eq!(app.titles("").await, before);
}

#[tokio::test]
async fn test_invalid_token_cannot_write_but_can_read() {
    let app = catalog_app().await;
    let (status, _) = app
        .request(Method::POST, "/books/", Some("not-a-token"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/books/", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_policy_runs_before_body_parsing() {
    let app = spawn_app().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/books/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =========================================================================
// WRITES
// =========================================================================

#[tokio::test]
async fn test_create_book() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "  Carrie ", "publication_year": 1974, "author": king})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Carrie");
    assert_eq!(body["author"], king);

    let (status, fetched) = app.get(&format!("/books/{}/", body["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_future_year_is_rejected() {
    let app = catalog_app().await;
    let token = app.token(Role::Librarian);
    let king = app.author_id("Stephen King").await;
    let before = app.book_count().await;
    let year = current_year();

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "Tomorrow", "publication_year": year + 1, "author": king})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["publication_year"][0].as_str().unwrap();
    assert!(message.contains("future"));
    assert!(message.contains(&year.to_string()));
    assert_eq!(app.book_count().await, before);

    let misery = app.book_id("Misery").await;
    for method in [Method::PUT, Method::PATCH] {
        let (status, body) = app
            .request(
                method,
                &format!("/books/{}/", misery),
                Some(&token),
                Some(json!({"title": "Misery", "publication_year": year + 5, "author": king})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["publication_year"].is_array());
    }
    let (_, misery_now) = app.get(&format!("/books/{}/", misery)).await;
    assert_eq!(misery_now["publication_year"], 1987);
}

#[tokio::test]
async fn test_current_and_ancient_years_are_accepted() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    for year in [current_year(), 1200] {
        let (status, body) = app
            .request(
                Method::POST,
                "/books/",
                Some(&token),
                Some(json!({"title": format!("Edition {}", year), "publication_year": year, "author": king})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["publication_year"], year);
    }
}

#[tokio::test]
async fn test_create_reports_every_field_error() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);

    let (status, body) = app
        .request(Method::POST, "/books/", Some(&token), Some(json!({"title": "   "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], json!(["This field may not be blank."]));
    assert_eq!(body["publication_year"], json!(["This field is required."]));
    assert_eq!(body["author"], json!(["This field is required."]));
}

#[tokio::test]
async fn test_create_with_unknown_author() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "Ghost", "publication_year": 2000, "author": 4242})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["author"], json!(["Invalid pk \"4242\" - object does not exist."]));
}

#[tokio::test]
async fn test_title_length_limit() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "x".repeat(201), "publication_year": 2000, "author": king})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], json!(["Ensure this field has no more than 200 characters."]));
}

#[tokio::test]
async fn test_put_requires_every_field() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let misery = app.book_id("Misery").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/books/{}/", misery),
            Some(&token),
            Some(json!({"title": "Only a title"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["publication_year"].is_array());
    assert!(body["author"].is_array());
}

#[tokio::test]
async fn test_put_replaces_book() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let orwell = app.author_id("George Orwell").await;
    let misery = app.book_id("Misery").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/books/{}/", misery),
            Some(&token),
            Some(json!({"title": "Homage to Catalonia", "publication_year": 1938, "author": orwell})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": misery, "title": "Homage to Catalonia", "publication_year": 1938, "author": orwell}));
}

#[tokio::test]
async fn test_patch_changes_only_supplied_fields() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;
    let misery = app.book_id("Misery").await;

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/books/{}/", misery),
            Some(&token),
            Some(json!({"title": "X"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "X");
    assert_eq!(body["publication_year"], 1987);
    assert_eq!(body["author"], king);
}

#[tokio::test]
async fn test_write_to_missing_book_is_404() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    let payload = json!({"title": "Nowhere", "publication_year": 2000, "author": king});
    for method in [Method::PUT, Method::PATCH, Method::DELETE] {
        let body = (method != Method::DELETE).then(|| payload.clone());
        let (status, _) = app.request(method.clone(), "/books/999/", Some(&token), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
    }
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let it = app.book_id("It").await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/books/{}/", it), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/books/{}/", it)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!app.titles("").await.contains(&"It".to_string()));
}

#[tokio::test]
async fn test_wrong_typed_fields_are_field_errors() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "Year as text", "publication_year": "nineteen", "author": king})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["publication_year"][0], "A valid integer is required.");

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "Too big", "publication_year": 99_999_999_999_i64, "author": "king"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["publication_year"][0], "A valid integer is required.");
    assert_eq!(body["author"][0], "A valid integer is required.");
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let king = app.author_id("Stephen King").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/books/",
            Some(&token),
            Some(json!({"title": "Carrie", "publication_year": "1974", "author": king.to_string()})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["publication_year"], 1974);
    assert_eq!(body["author"], king);
}

#[tokio::test]
async fn test_null_field_is_rejected() {
    let app = catalog_app().await;
    let token = app.token(Role::Member);
    let misery = app.book_id("Misery").await;

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/books/{}/", misery),
            Some(&token),
            Some(json!({"title": null})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"title": ["This field may not be null."]}));

    let (_, book) = app.get(&format!("/books/{}/", misery)).await;
    assert_eq!(book["title"], "Misery");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;
    let token = app.token(Role::Member);
    let (status, body) = app
        .request(Method::POST, "/books/", Some(&token), Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}
