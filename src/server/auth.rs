//! Credentials: bcrypt password hashes and HS256 bearer tokens.
//!
//! Handlers only ever ask [`Authorizer::authorize`] whether a token maps to
//! a user; nothing else inspects token contents.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use jsonwebtoken::{decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::server::error::ApiError;
use crate::server::routes::AppState;
use crate::server::types::UserId;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Maps a bearer credential to the user it was issued for.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, token: &str) -> Option<UserId>;
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    bcrypt_cost: u32,
}

impl JwtAuth {
    pub fn new(secret: &[u8], ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl,
            bcrypt_cost,
        }
    }

    pub fn issue(&self, user: UserId) -> Result<String, AuthError> {
        self.issue_with_expiry(user, get_current_timestamp() + self.ttl.as_secs())
    }

    pub fn issue_with_expiry(&self, user: UserId, exp: u64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.to_string(),
            exp,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Authorizer for JwtAuth {
    fn authorize(&self, token: &str) -> Option<UserId> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).ok()?;
        data.claims.sub.parse().ok().map(UserId)
    }
}

/// Pull the credential out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized("No token"))?;
    value
        .to_str()
        .ok()
        .and_then(|v| v.split_whitespace().nth(1))
        .ok_or(ApiError::Unauthorized("Token invalid"))
}

/// Extractor for routes that need a signed-in user.
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        state
            .auth
            .authorize(token)
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized("Token invalid"))
    }
}
