//! Server settings read from the environment.
//!
//! `VELOCITY_PORT`, `JWT_SECRET`, `VELOCITY_TOKEN_TTL_HOURS`,
//! `VELOCITY_BCRYPT_COST` and `VELOCITY_DATA`.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SECRET: &str = "secret";
pub const DEFAULT_TOKEN_TTL_HOURS: u64 = 24 * 7;
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub data_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: DEFAULT_SECRET.to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 3600),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            data_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the insecure default");
                defaults.jwt_secret
            }
        };
        let ttl_hours = lookup("VELOCITY_TOKEN_TTL_HOURS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_HOURS);

        Self {
            port: lookup("VELOCITY_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_hours * 3600),
            // bcrypt accepts 4..=31
            bcrypt_cost: lookup("VELOCITY_BCRYPT_COST")
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|c| (4..=31).contains(c))
                .unwrap_or(defaults.bcrypt_cost),
            data_path: lookup("VELOCITY_DATA")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }
}
