use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use reelgraph::{api, Config, Platform};

fn app() -> Router {
    let config = Config::default();
    api::router(Platform::with_config(&config.feed).into_shared(), &config).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_counts() {
    let app = app();
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;

    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 1);
    assert_eq!(body["videos"], 0);
}

#[tokio::test]
async fn full_social_flow() {
    let app = app();

    let (status, alice) = send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alice["id"], 1);
    let (_, bob) = send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Bob"}))).await;
    assert_eq!(bob["id"], 2);

    let (status, cats) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Cats", "owner_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cats["id"], 1);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/users/2/follow",
        Some(json!({"followee_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, following) = send_json(&app, Method::GET, "/api/v1/users/2/following", None).await;
    assert_eq!(following, json!([1]));

    // Default reaction kind is "like"
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/reactions",
        Some(json!({"user_id": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/reactions",
        Some(json!({"user_id": 1, "kind": "like"})),
    )
    .await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/comments",
        Some(json!({"user_id": 2, "text": "nice video"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, feed) = send_json(&app, Method::GET, "/api/v1/feed/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["total"], 1);
    assert_eq!(feed["items"][0]["title"], "Cats");
    assert_eq!(feed["items"][0]["owner_name"], "Alice");
    assert_eq!(feed["items"][0]["reactions"]["like"], 2);
    assert_eq!(feed["items"][0]["comments"], json!(["Bob: nice video"]));

    // Bob posts; Alice does not follow Bob
    send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Dogs", "owner_id": 2})),
    )
    .await;
    let (_, alice_feed) = send_json(&app, Method::GET, "/api/v1/feed/1", None).await;
    assert_eq!(alice_feed["total"], 1);
    assert_eq!(alice_feed["items"][0]["title"], "Cats");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/v1/feed/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Ghost", "owner_id": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/comments",
        Some(json!({"user_id": 1, "text": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, videos) = send_json(&app, Method::GET, "/api/v1/videos", None).await;
    assert_eq!(videos, json!([]));
}

#[tokio::test]
async fn hidden_video_cannot_be_liked() {
    let app = app();
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Bob"}))).await;
    send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Dogs", "owner_id": 2})),
    )
    .await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/reactions",
        Some(json!({"user_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, video) = send_json(&app, Method::GET, "/api/v1/videos/1", None).await;
    assert_eq!(video["reactions"], json!({}));
}

#[tokio::test]
async fn blank_reaction_kind_is_bad_request() {
    let app = app();
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;
    send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Cats", "owner_id": 1})),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/reactions",
        Some(json!({"user_id": 1, "kind": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_ids_and_bodies_are_bad_request() {
    let app = app();
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;
    send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Cats", "owner_id": 1})),
    )
    .await;

    let (status, body) = send_json(&app, Method::GET, "/api/v1/feed/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send_json(&app, Method::GET, "/api/v1/videos/-3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Missing `name`
    let (status, body) = send_json(&app, Method::POST, "/api/v1/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/videos/1/reactions",
        Some(json!({"user_id": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());

    // Nothing was registered or recorded by the rejected requests
    let (_, health) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(health["users"], 1);
    let (_, video) = send_json(&app, Method::GET, "/api/v1/videos/1", None).await;
    assert_eq!(video["reactions"], json!({}));
}

#[tokio::test]
async fn text_feed_renders() {
    let app = app();
    send_json(&app, Method::POST, "/api/v1/users", Some(json!({"name": "Alice"}))).await;

    let (status, bytes) = send(&app, Method::GET, "/api/v1/feed/1/text", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap(), "Your feed is empty.\n");

    send_json(
        &app,
        Method::POST,
        "/api/v1/videos",
        Some(json!({"title": "Cats", "owner_id": 1})),
    )
    .await;
    let (_, bytes) = send(&app, Method::GET, "/api/v1/feed/1/text", None).await;
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("Feed for Alice:\nID: 1 - Title: Cats - Owner: Alice\n"));
    assert!(text.contains("Reactions: None\n"));
}
