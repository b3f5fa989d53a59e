use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::auth::AuthError;
use crate::server::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("User already exists")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }
        let body = Json(serde_json::json!({ "msg": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownUser(_) => ApiError::NotFound,
            StoreError::DuplicateEmail(_) => ApiError::DuplicateEmail,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::types::UserId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized("No token").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_convert() {
        assert!(matches!(
            ApiError::from(StoreError::UnknownUser(UserId(3))),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(StoreError::DuplicateEmail("a@b.c".into())),
            ApiError::DuplicateEmail
        ));
    }
}
