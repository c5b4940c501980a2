//! Secret material and lifetimes shared by the token codec and the
//! refresh-secret generator.
//!
//! [`AuthConfig`] is constructed explicitly (by the API crate from the
//! environment, by tests directly) and handed to the components that need it,
//! so two managers with different keys can coexist in one process.

use std::fmt;

use chrono::Duration;

use crate::error::CoreError;

/// Default access token lifetime in minutes (12 hours).
pub const DEFAULT_ACCESS_TTL_MINS: i64 = 12 * 60;
/// Default refresh secret lifetime in hours.
pub const DEFAULT_REFRESH_TTL_HOURS: i64 = 12;
/// Upper bound for either lifetime.
pub const MAX_TOKEN_TTL_DAYS: i64 = 366;

/// Argon2id cost parameters for refresh-secret hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for HashCost {
    /// The argon2 crate's recommended defaults (19 MiB, 2 passes, 1 lane).
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    /// The cheapest parameters argon2 accepts. Only for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }

    /// Convert into validated argon2 parameters.
    pub fn params(&self) -> Result<argon2::Params, CoreError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CoreError::Validation(format!("Invalid hash cost: {e}")))
    }
}

/// Signing key, hash cost and token lifetimes.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens.
    pub signing_key: String,
    /// Argon2id cost for refresh-secret hashes.
    pub hash_cost: HashCost,
    /// Access token lifetime.
    pub access_token_ttl: Duration,
    /// Refresh secret lifetime.
    pub refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Build a config with default cost and lifetimes.
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            hash_cost: HashCost::default(),
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINS),
            refresh_token_ttl: Duration::hours(DEFAULT_REFRESH_TTL_HOURS),
        }
    }

    /// Reject configurations that would produce unusable tokens or hashes.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.signing_key.is_empty() {
            return Err(CoreError::Validation("Signing key must not be empty".into()));
        }
        if self.access_token_ttl <= Duration::zero() {
            return Err(CoreError::Validation(
                "Access token lifetime must be positive".into(),
            ));
        }
        if self.refresh_token_ttl <= Duration::zero() {
            return Err(CoreError::Validation(
                "Refresh token lifetime must be positive".into(),
            ));
        }
        let max_ttl = Duration::days(MAX_TOKEN_TTL_DAYS);
        if self.access_token_ttl > max_ttl || self.refresh_token_ttl > max_ttl {
            return Err(CoreError::Validation(format!(
                "Token lifetimes must not exceed {MAX_TOKEN_TTL_DAYS} days"
            )));
        }
        self.hash_cost.params()?;
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key", &"<redacted>")
            .field("hash_cost", &self.hash_cost)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AuthConfig::new("a-long-enough-test-secret");
        assert!(config.validate().is_ok());
        assert_eq!(config.access_token_ttl, Duration::hours(12));
        assert_eq!(config.refresh_token_ttl, Duration::hours(12));
    }

    #[test]
    fn test_empty_key_rejected() {
        let config = AuthConfig::new("");
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = AuthConfig::new("secret");
        config.refresh_token_ttl = Duration::zero();
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let mut config = AuthConfig::new("secret");
        config.refresh_token_ttl = Duration::try_hours(3_000_000_000).unwrap();
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));

        let mut config = AuthConfig::new("secret");
        config.access_token_ttl = Duration::days(MAX_TOKEN_TTL_DAYS + 1);
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));

        let mut config = AuthConfig::new("secret");
        config.refresh_token_ttl = Duration::days(MAX_TOKEN_TTL_DAYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_hash_cost_rejected() {
        let mut config = AuthConfig::new("secret");
        config.hash_cost.parallelism = 0;
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AuthConfig::new("super-secret-value");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
