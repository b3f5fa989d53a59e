//! Blocking HTTP client for the score backend.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::client::config::Credentials;
use crate::server::types::{AuthResponse, BestScoreResponse, PublicUser, ScoreResponse};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("missing or rejected credentials")]
    Unauthorized,
    #[error("request rejected: {0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error("backend unreachable: {0}")]
    TransientNetwork(String),
    #[error("unexpected status {0}")]
    Unexpected(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Only failures to reach the backend are worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::TransientNetwork(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ClientError::Unexpected(status.as_u16()),
            None => ClientError::TransientNetwork(err.to_string()),
        }
    }
}

/// The one call the race needs at the finish line.
pub trait ScoreApi: Send + Sync + 'static {
    fn submit_score(&self, score: u32) -> Result<ScoreResponse, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    msg: String,
}

/// Map a non-success status onto the client taxonomy.
pub fn classify(status: StatusCode, message: Option<String>) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST => {
            ClientError::Validation(message.unwrap_or_else(|| "bad request".to_string()))
        }
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ClientError::TransientNetwork(format!("status {}", status.as_u16()))
        }
        other => ClientError::Unexpected(other.as_u16()),
    }
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;
        let auth: AuthResponse = parse(response)?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()?;
        let auth: AuthResponse = parse(response)?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    pub fn best_score(&self) -> Result<u64, ClientError> {
        let response = self.authorized(self.http.get(self.url("/scores/best")))?.send()?;
        let best: BestScoreResponse = parse(response)?;
        Ok(best.best_score)
    }

    /// Sign in with whatever the player configured and return the best
    /// score the backend holds for them. `Ok(None)` means no credentials.
    pub fn connect(&mut self, credentials: &Credentials) -> Result<Option<u64>, ClientError> {
        let best = match credentials {
            Credentials::Anonymous => return Ok(None),
            Credentials::Token(token) => {
                self.token = Some(token.clone());
                // a stale token shows up here instead of at the finish line
                self.best_score()?
            }
            Credentials::Login { email, password } => self.login(email, password)?.best_score,
            Credentials::Register { name, email, password } => {
                match self.register(name, email, password) {
                    Ok(user) => user.best_score,
                    Err(ClientError::Validation(msg)) => {
                        tracing::info!(%msg, "registration refused, trying login");
                        self.login(email, password)?.best_score
                    }
                    Err(err) => return Err(err),
                }
            }
        };
        Ok(Some(best))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::Unauthorized)?;
        Ok(request.bearer_auth(token))
    }
}

impl ScoreApi for ApiClient {
    fn submit_score(&self, score: u32) -> Result<ScoreResponse, ClientError> {
        let response = self
            .authorized(self.http.post(self.url("/scores")))?
            .json(&serde_json::json!({ "score": score }))
            .send()?;
        parse(response)
    }
}

fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }
    let message = response.json::<ErrorBody>().ok().map(|body| body.msg);
    Err(classify(status, message))
}
