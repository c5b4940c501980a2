use std::str::FromStr;

use chrono::Duration;
use tollgate_core::config::{DEFAULT_ACCESS_TTL_MINS, DEFAULT_REFRESH_TTL_HOURS};
use tollgate_core::{AuthConfig, HashCost};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("Auth configuration rejected: {0}")]
    Auth(#[from] tollgate_core::CoreError),
}

/// Server configuration loaded from environment variables.
///
/// All fields except the signing secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Take the client IP from `X-Forwarded-For` / `X-Real-IP` instead of the
    /// socket peer. Only enable behind a proxy that sets these headers.
    pub trust_proxy_headers: bool,
    /// Signing key, hash cost and token lifetimes.
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Required | Default                 |
    /// |---------------------------|----------|-------------------------|
    /// | `HOST`                    | no       | `0.0.0.0`               |
    /// | `PORT`                    | no       | `3000`                  |
    /// | `CORS_ORIGINS`            | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | no       | `30`                    |
    /// | `TRUST_PROXY_HEADERS`     | no       | `false`                 |
    /// | `JWT_SECRET`              | **yes**  | --                      |
    /// | `ACCESS_TOKEN_TTL_MINS`   | no       | `720`                   |
    /// | `REFRESH_TOKEN_TTL_HOURS` | no       | `12`                    |
    /// | `HASH_MEMORY_KIB`         | no       | `19456`                 |
    /// | `HASH_ITERATIONS`         | no       | `2`                     |
    /// | `HASH_PARALLELISM`        | no       | `1`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// [`from_env`](Self::from_env) passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let trust_proxy_headers: bool = parse_or(&lookup, "TRUST_PROXY_HEADERS", false)?;

        let signing_key = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access_ttl_mins: i64 =
            parse_or(&lookup, "ACCESS_TOKEN_TTL_MINS", DEFAULT_ACCESS_TTL_MINS)?;
        let refresh_ttl_hours: i64 =
            parse_or(&lookup, "REFRESH_TOKEN_TTL_HOURS", DEFAULT_REFRESH_TTL_HOURS)?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&lookup, "HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "HASH_PARALLELISM", defaults.parallelism)?,
        };

        let access_token_ttl =
            Duration::try_minutes(access_ttl_mins).ok_or_else(|| ConfigError::Invalid {
                var: "ACCESS_TOKEN_TTL_MINS",
                value: access_ttl_mins.to_string(),
            })?;
        let refresh_token_ttl =
            Duration::try_hours(refresh_ttl_hours).ok_or_else(|| ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_HOURS",
                value: refresh_ttl_hours.to_string(),
            })?;

        let auth = AuthConfig {
            signing_key,
            hash_cost,
            access_token_ttl,
            refresh_token_ttl,
        };
        auth.validate()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            trust_proxy_headers,
            auth,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
