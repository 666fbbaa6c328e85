mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{bearer, spawn_app};
use linkguard::domain::entities::{Creator, Role};
use serde_json::Value;

#[tokio::test]
async fn test_admin_listing_requires_session() {
    let app = spawn_app();

    let response = app.server.get("/api/admin/links").await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_admin_listing_forbidden_for_regular_user() {
    let app = spawn_app();
    app.tokens.issue("user-token", 7, Role::User);

    app.server
        .get("/api/admin/links")
        .add_header("Authorization", bearer("user-token"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_listing_forbidden_for_unknown_token() {
    let app = spawn_app();

    app.server
        .get("/api/admin/links")
        .add_header("Authorization", bearer("forged"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_sees_every_creator() {
    let app = spawn_app();
    app.tokens.issue("admin-token", 1, Role::Admin);
    app.links.add_user(7, "Alice", "alice@example.com");

    let now = Utc::now();
    app.links.insert_at(
        "anon01",
        "https://a.example",
        Creator::Anonymous {
            ip: Some("198.51.100.7".to_string()),
        },
        now - Duration::minutes(5),
    );
    app.links
        .insert_at("user01", "https://b.example", Creator::User(7), now);

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("pageSize", 10)
        .add_header("Authorization", bearer("admin-token"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(body["page_size"], 10);
    assert_eq!(body["total_pages"], 1);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["slug"], "user01");
    assert_eq!(data[0]["user_id"], 7);
    assert_eq!(data[0]["user_name"], "Alice");
    assert_eq!(data[0]["user_email"], "alice@example.com");
    assert!(data[0]["creator_ip"].is_null());

    assert_eq!(data[1]["slug"], "anon01");
    assert!(data[1]["user_id"].is_null());
    assert_eq!(data[1]["creator_ip"], "198.51.100.7");
    assert_eq!(data[1]["short_url"], "https://lg.example/anon01");
}

#[tokio::test]
async fn test_admin_page_size_is_clamped() {
    let app = spawn_app();
    app.tokens.issue("admin-token", 1, Role::Admin);

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("page_size", 1000)
        .add_query_param("page", 0)
        .add_header("Authorization", bearer("admin-token"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["page_size"], 100);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn test_admin_page_past_the_end_is_empty() {
    let app = spawn_app();
    app.tokens.issue("admin-token", 1, Role::Admin);

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("page", i64::MAX)
        .add_header("Authorization", bearer("admin-token"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"].as_array().unwrap().is_empty());
}
