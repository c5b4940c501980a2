//! The per-client session record.

use crate::types::Timestamp;

/// The single live session for a client GUID.
///
/// `refresh_secret_hash` is an Argon2id PHC string. The raw refresh secret is
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub guid: String,
    pub refresh_secret_hash: String,
    pub expires_at: Timestamp,
    pub client_ip: String,
}

impl Session {
    /// Whether the refresh secret has lapsed as of `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at < now
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn session_expiring(expires_at: Timestamp) -> Session {
        Session {
            guid: "guid-1".to_string(),
            refresh_secret_hash: "$argon2id$dummy".to_string(),
            expires_at,
            client_ip: "1.2.3.4".to_string(),
        }
    }

    #[test]
    fn test_expiry_is_evaluated_against_now() {
        let now = Utc::now();
        assert!(session_expiring(now - Duration::seconds(1)).is_expired_at(now));
        assert!(!session_expiring(now + Duration::seconds(1)).is_expired_at(now));
        // Expiry is strict: a session expiring exactly now is still usable.
        assert!(!session_expiring(now).is_expired_at(now));
    }
}
