//! Session lifecycle: issuing and rotating token pairs.
//!
//! A GUID has no session until its first [`SessionManager::issue`]. Issue
//! upserts the session; every successful [`SessionManager::refresh`] rotates
//! the refresh secret in place with a compare-and-swap on the previous hash.
//! Expiry is checked lazily on refresh; nothing sweeps old rows.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::AuthConfig;
use crate::error::CoreError;
use crate::notify::AnomalyNotifier;
use crate::secret::{GeneratedSecret, RefreshSecretGenerator};
use crate::session::Session;
use crate::store::SessionStore;
use crate::token::{AccessClaims, TokenCodec};
use crate::types::{expiry_after, Timestamp};

/// The token pair handed back to a client.
#[derive(Clone)]
pub struct IssuedTokens {
    /// Signed JWT access token.
    pub access_token: String,
    /// Base64 (standard) encoding of the raw refresh secret.
    pub refresh_token: String,
    pub access_expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
}

impl fmt::Debug for IssuedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

/// Issues and refreshes token pairs against a [`SessionStore`].
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct SessionManager {
    codec: TokenCodec,
    secrets: RefreshSecretGenerator,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn AnomalyNotifier>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl SessionManager {
    /// Build a manager from validated secret material and its collaborators.
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn AnomalyNotifier>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            codec: TokenCodec::new(&config.signing_key),
            secrets: RefreshSecretGenerator::new(config.hash_cost)?,
            store,
            notifier,
            access_token_ttl: config.access_token_ttl,
            refresh_token_ttl: config.refresh_token_ttl,
        })
    }

    /// Access token lifetime.
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Issue a fresh token pair for `guid`, replacing any existing session.
    pub async fn issue(&self, guid: &str, client_ip: &str) -> Result<IssuedTokens, CoreError> {
        require_non_empty("guid", guid)?;
        require_non_empty("client ip", client_ip)?;

        let access = self.codec.issue(guid, client_ip, self.access_token_ttl)?;
        let secret = self.generate_secret().await?;
        let refresh_expires_at = self.refresh_expiry()?;

        let session = Session {
            guid: guid.to_string(),
            refresh_secret_hash: secret.hash.clone(),
            expires_at: refresh_expires_at,
            client_ip: client_ip.to_string(),
        };
        self.store.upsert(&session).await?;

        tracing::info!(guid, client_ip, "Issued new session");

        Ok(IssuedTokens {
            access_token: access.token,
            refresh_token: secret.encoded(),
            access_expires_at: access.expires_at,
            refresh_expires_at,
        })
    }

    /// Exchange a raw refresh secret for a new token pair.
    ///
    /// Gates run in order: session exists, secret matches, not expired. An IP
    /// change does not block the refresh; it triggers a notification once the
    /// rotation is committed. The new access token's subject comes from the
    /// stored session.
    pub async fn refresh(
        &self,
        raw_secret: &[u8],
        guid: &str,
        current_ip: &str,
    ) -> Result<IssuedTokens, CoreError> {
        require_non_empty("guid", guid)?;
        require_non_empty("client ip", current_ip)?;

        let session = self.store.get(guid).await?;

        if !self
            .verify_secret(raw_secret, &session.refresh_secret_hash)
            .await?
        {
            tracing::info!(guid, "Refresh rejected: secret mismatch");
            return Err(CoreError::InvalidCredential);
        }

        if session.is_expired_at(Utc::now()) {
            tracing::info!(guid, expires_at = %session.expires_at, "Refresh rejected: expired");
            return Err(CoreError::Expired);
        }

        let access = self
            .codec
            .issue(&session.guid, current_ip, self.access_token_ttl)?;
        let secret = self.generate_secret().await?;
        let refresh_expires_at = self.refresh_expiry()?;

        let rotated = Session {
            guid: session.guid.clone(),
            refresh_secret_hash: secret.hash.clone(),
            expires_at: refresh_expires_at,
            client_ip: current_ip.to_string(),
        };
        self.store
            .compare_and_swap_refresh_hash(&session.guid, &session.refresh_secret_hash, &rotated)
            .await?;

        if session.client_ip != current_ip {
            self.spawn_anomaly_notification(&session.guid, &session.client_ip, current_ip);
        }

        tracing::info!(guid = %session.guid, client_ip = current_ip, "Rotated refresh token");

        Ok(IssuedTokens {
            access_token: access.token,
            refresh_token: secret.encoded(),
            access_expires_at: access.expires_at,
            refresh_expires_at,
        })
    }

    /// Validate an access token and return its claims.
    pub fn authenticate(&self, access_token: &str) -> Result<AccessClaims, CoreError> {
        self.codec.parse(access_token)
    }

    fn refresh_expiry(&self) -> Result<Timestamp, CoreError> {
        expiry_after(Utc::now(), self.refresh_token_ttl).ok_or_else(|| {
            CoreError::Internal(format!(
                "Refresh lifetime {} is out of range",
                self.refresh_token_ttl
            ))
        })
    }

    /// Argon2 is deliberately slow; keep it off the async workers.
    async fn generate_secret(&self) -> Result<GeneratedSecret, CoreError> {
        let secrets = self.secrets.clone();
        tokio::task::spawn_blocking(move || secrets.generate())
            .await
            .map_err(|e| CoreError::Internal(format!("Secret generation task failed: {e}")))?
    }

    async fn verify_secret(&self, raw: &[u8], stored_hash: &str) -> Result<bool, CoreError> {
        let secrets = self.secrets.clone();
        let raw = raw.to_vec();
        let stored_hash = stored_hash.to_string();
        tokio::task::spawn_blocking(move || secrets.verify(&raw, &stored_hash))
            .await
            .map_err(|e| CoreError::Internal(format!("Secret verification task failed: {e}")))?
    }

    fn spawn_anomaly_notification(&self, guid: &str, old_ip: &str, new_ip: &str) {
        let notifier = Arc::clone(&self.notifier);
        let guid = guid.to_string();
        let old_ip = old_ip.to_string();
        let new_ip = new_ip.to_string();

        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&guid, &old_ip, &new_ip).await {
                tracing::warn!(guid = %guid, error = %e, "IP change notification failed");
            }
        });
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is empty")));
    }
    Ok(())
}
