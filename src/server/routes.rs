//! Axum HTTP routes for accounts and scores.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/auth/register` | Create an account, returns a token |
//! | POST | `/auth/login` | Exchange credentials for a token |
//! | POST | `/scores` | Submit a race score, keep the personal best |
//! | GET | `/scores/best` | Read the personal best |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::auth::{AuthUser, JwtAuth};
use crate::server::error::ApiError;
use crate::server::store::UserStore;
use crate::server::types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub auth: Arc<JwtAuth>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, auth: JwtAuth) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/scores", post(handle_submit_score))
        .route("/scores/best", get(handle_best_score))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health_check() -> Json<Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

/// bcrypt and snapshot writes block, so they run off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

// ── Accounts ────────────────────────────────────────────────────────

async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let name = req.name.trim();
    let email = normalize_email(&req.email);
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Name, email and password are required".into()));
    }
    if state.store.find_by_email(&email)?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let auth = Arc::clone(&state.auth);
    let store = Arc::clone(&state.store);
    let name = name.to_string();
    let password = req.password;
    let user = blocking(move || {
        let password_hash = auth.hash_password(&password)?;
        Ok(store.create_user(NewUser {
            name,
            email,
            password_hash,
        })?)
    })
    .await?;
    tracing::info!(user = %user.id, "registered");

    Ok(Json(AuthResponse {
        token: state.auth.issue(user.id)?,
        user: PublicUser::from(&user),
    }))
}

async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let user = state
        .store
        .find_by_email(&req.email)?
        .ok_or(ApiError::InvalidCredentials)?;
    let auth = Arc::clone(&state.auth);
    let hash = user.password_hash.clone();
    let verified = blocking(move || Ok(auth.verify_password(&req.password, &hash))).await?;
    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Json(AuthResponse {
        token: state.auth.issue(user.id)?,
        user: PublicUser::from(&user),
    }))
}

// ── Scores ──────────────────────────────────────────────────────────

/// Accept any JSON number that is a whole, non-negative value.
pub fn parse_score(body: &Value) -> Result<u64, ApiError> {
    let invalid = || ApiError::Validation("Score must be a number".into());
    let Some(Value::Number(number)) = body.get("score") else {
        return Err(invalid());
    };
    if let Some(score) = number.as_u64() {
        return Ok(score);
    }
    match number.as_f64() {
        // 2^64 rounds to u64::MAX as f64, so the bound is exclusive
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
        _ => Err(invalid()),
    }
}

async fn handle_submit_score(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let score = parse_score(&body)?;

    let store = Arc::clone(&state.store);
    let response = blocking(move || Ok(store.record_score(user, score)?)).await?;
    tracing::info!(
        user = %user,
        score = response.current_score,
        best = response.best_score,
        "score submitted"
    );
    Ok(Json(response))
}

async fn handle_best_score(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BestScoreResponse>, ApiError> {
    let best_score = state.store.best_score(user)?;
    Ok(Json(BestScoreResponse { best_score }))
}
