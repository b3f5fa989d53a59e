//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), no TCP binding needed.
//! bcrypt runs at its minimum cost so registration stays fast.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use velocity::server::{create_router, AppState, JwtAuth, MemoryStore, UserId, UserStore};

const SECRET: &[u8] = b"test-secret";

fn jwt() -> JwtAuth {
    JwtAuth::new(SECRET, Duration::from_secs(3600), 4)
}

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), jwt());
    (create_router(state), store)
}

/// Parse response body as JSON.
async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            json!({ "name": name, "email": email, "password": password }),
        ))
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

async fn submit(app: &Router, token: &str, score: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(post_json("/scores", Some(token), json!({ "score": score })))
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

async fn registered_token(app: &Router) -> String {
    let (status, json) = register(app, "Ada", "ada@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

// ── GET /health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let (app, _) = app();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "OK");
}

// ── /auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_returns_token_and_public_user() {
    let (app, _) = app();
    let (status, json) = register(&app, "Ada", "Ada@Example.com", "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["user"]["name"], "Ada");
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["bestScore"], 0);
    assert!(json["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_duplicate_email_is_400() {
    let (app, store) = app();
    registered_token(&app).await;
    let (status, json) = register(&app, "Other", "ADA@example.com", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["msg"].is_string());
    assert_eq!(store.user_count(), 1);
}

#[tokio::test]
async fn register_missing_fields_is_400() {
    let (app, _) = app();
    let (status, _) = register(&app, "", "ada@example.com", "pw").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_round_trip() {
    let (app, _) = app();
    registered_token(&app).await;
    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    let token = json["token"].as_str().unwrap();

    let (status, _) = submit(&app, token, json!(42)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_wrong_password_is_401() {
    let (app, _) = app();
    registered_token(&app).await;
    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unknown_email_is_401() {
    let (app, _) = app();
    let resp = app
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "pw" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── POST /scores ─────────────────────────────────────────────────────

#[tokio::test]
async fn submit_without_token_is_401_and_does_not_mutate() {
    let (app, store) = app();
    let token = registered_token(&app).await;
    submit(&app, &token, json!(100)).await;

    let resp = app
        .clone()
        .oneshot(post_json("/scores", None, json!({ "score": 500 })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["msg"], "No token");

    let user = store.find_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(store.best_score(user.id).unwrap(), 100);
}

#[tokio::test]
async fn submit_with_garbage_token_is_401() {
    let (app, _) = app();
    let (status, _) = submit(&app, "not-a-jwt", json!(10)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_with_foreign_secret_is_401() {
    let (app, _) = app();
    registered_token(&app).await;
    let forged = JwtAuth::new(b"other-secret", Duration::from_secs(3600), 4)
        .issue(UserId(0))
        .unwrap();
    let (status, _) = submit(&app, &forged, json!(10)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submit_non_number_is_400() {
    let (app, store) = app();
    let token = registered_token(&app).await;

    for bad in [json!("150"), json!(null), json!(-3), json!(2.5)] {
        let (status, json) = submit(&app, &token, bad.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "score={bad}");
        assert_eq!(json["msg"], "Score must be a number");
    }
    let user = store.find_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(store.best_score(user.id).unwrap(), 0);
}

#[tokio::test]
async fn lower_score_keeps_best() {
    let (app, _) = app();
    let token = registered_token(&app).await;

    let (_, first) = submit(&app, &token, json!(100)).await;
    assert_eq!(first, json!({ "currentScore": 100, "bestScore": 100 }));

    let (status, second) = submit(&app, &token, json!(50)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, json!({ "currentScore": 50, "bestScore": 100 }));
}

#[tokio::test]
async fn higher_score_replaces_best() {
    let (app, _) = app();
    let token = registered_token(&app).await;
    submit(&app, &token, json!(100)).await;

    let (_, json) = submit(&app, &token, json!(150)).await;
    assert_eq!(json, json!({ "currentScore": 150, "bestScore": 150 }));
}

#[tokio::test]
async fn resubmitting_same_score_is_idempotent() {
    let (app, _) = app();
    let token = registered_token(&app).await;

    let (_, first) = submit(&app, &token, json!(120)).await;
    let (_, second) = submit(&app, &token, json!(120)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn whole_float_score_is_accepted() {
    let (app, _) = app();
    let token = registered_token(&app).await;
    let (status, json) = submit(&app, &token, json!(150.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["bestScore"], 150);
}

#[tokio::test]
async fn token_for_missing_user_is_404() {
    let (app, _) = app();
    let token = jwt().issue(UserId(999)).unwrap();

    let (status, json) = submit(&app, &token, json!(10)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["msg"].is_string());

    let resp = app
        .clone()
        .oneshot(get_with_token("/scores/best", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── GET /scores/best ─────────────────────────────────────────────────

#[tokio::test]
async fn best_score_reflects_submissions() {
    let (app, _) = app();
    let token = registered_token(&app).await;
    for score in [30, 90, 60] {
        submit(&app, &token, json!(score)).await;
    }

    let resp = app
        .clone()
        .oneshot(get_with_token("/scores/best", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["bestScore"], 90);
}

#[tokio::test]
async fn best_score_without_token_is_401() {
    let (app, _) = app();
    let resp = app
        .oneshot(Request::get("/scores/best").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Snapshot-backed store ────────────────────────────────────────────

#[tokio::test]
async fn failed_snapshot_write_does_not_reserve_email() {
    let dir = std::env::temp_dir().join(format!("velocity-api-missing-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("users.json");
    let store = Arc::new(MemoryStore::with_snapshot(&path).unwrap());
    let app = create_router(AppState::new(store.clone(), jwt()));

    let (status, json) = register(&app, "Ada", "ada@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["msg"], "Server error");
    assert_eq!(store.user_count(), 0);

    std::fs::create_dir_all(&dir).unwrap();
    let (status, _) = register(&app, "Ada", "ada@example.com", "hunter22").await;
    assert_eq!(status, StatusCode::OK);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn snapshot_store_persists_best_score() {
    let path = std::env::temp_dir().join(format!("velocity-api-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let store = Arc::new(MemoryStore::with_snapshot(&path).unwrap());
    let app = create_router(AppState::new(store, jwt()));

    let token = registered_token(&app).await;
    let (status, _) = submit(&app, &token, json!(300)).await;
    assert_eq!(status, StatusCode::OK);

    let reloaded = MemoryStore::with_snapshot(&path).unwrap();
    let user = reloaded.find_by_email("ada@example.com").unwrap().unwrap();
    assert_eq!(reloaded.best_score(user.id).unwrap(), 300);
    let _ = std::fs::remove_file(&path);
}
