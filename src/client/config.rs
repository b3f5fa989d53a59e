//! Client settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::game_logic::CpuDifficulty;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PREFS_PATH: &str = "velocity_prefs.json";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How the client gets a bearer token, if at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    Token(String),
    Login { email: String, password: String },
    /// Create the account, or log in if the email is already taken.
    Register { name: String, email: String, password: String },
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub credentials: Credentials,
    pub prefs_path: PathBuf,
    pub difficulty: CpuDifficulty,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (
            non_empty("VELOCITY_TOKEN"),
            non_empty("VELOCITY_EMAIL"),
            non_empty("VELOCITY_PASSWORD"),
        ) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(email), Some(password)) => match non_empty("VELOCITY_NAME") {
                Some(name) => Credentials::Register { name, email, password },
                None => Credentials::Login { email, password },
            },
            _ => Credentials::Anonymous,
        };

        Self {
            api_url: non_empty("VELOCITY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            credentials,
            prefs_path: non_empty("VELOCITY_PREFS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH)),
            difficulty: non_empty("VELOCITY_DIFFICULTY")
                .and_then(|s| CpuDifficulty::parse(&s))
                .unwrap_or_default(),
        }
    }
}
