// src/config.rs

use std::{env, time::Duration};

use dotenvy::dotenv;

/// Percentage a quiz attempt must reach to count as passed.
pub const PASSING_SCORE_PERCENTAGE: u8 = 70;

/// How long a cached value stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_NAMESPACE: &str = "elearning";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the service runs on an in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    /// Prefix (`<ns>`) for every document path.
    pub namespace: String,
    pub passing_score: u8,
    pub cache_ttl: Duration,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let namespace =
            env::var("STORE_NAMESPACE").unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());

        let passing_score = parse_var("PASSING_SCORE", PASSING_SCORE_PERCENTAGE)?;
        if passing_score > 100 {
            return Err(format!("PASSING_SCORE must be within 0..=100, got {passing_score}"));
        }

        let cache_ttl = Duration::from_secs(parse_var("CACHE_TTL_SECS", CACHE_TTL.as_secs())?);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            namespace,
            passing_score,
            cache_ttl,
            bind_addr,
        })
    }

    /// Configuration with every default applied, for tests and local tooling.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: None,
            jwt_secret: jwt_secret.into(),
            rust_log: "info".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            passing_score: PASSING_SCORE_PERCENTAGE,
            cache_ttl: CACHE_TTL,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let config = Config::with_secret("secret");
        assert_eq!(config.passing_score, 70);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.namespace, "elearning");
        assert!(config.database_url.is_none());
    }
}
