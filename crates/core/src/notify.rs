//! IP-change notification seam.
//!
//! The lifecycle manager calls an [`AnomalyNotifier`] when a refresh comes
//! from a different IP than the one recorded on the session. The call runs on
//! a detached task: it never delays or fails the refresh, and its errors are
//! only logged.

use async_trait::async_trait;

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Receives IP-change warnings for a client.
#[async_trait]
pub trait AnomalyNotifier: Send + Sync {
    async fn notify(&self, guid: &str, old_ip: &str, new_ip: &str) -> Result<(), NotifyError>;
}

/// Writes IP-change warnings to the log.
///
/// Stands in for a mail or webhook channel; no user directory exists to
/// resolve a GUID to an address.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl AnomalyNotifier for LogNotifier {
    async fn notify(&self, guid: &str, old_ip: &str, new_ip: &str) -> Result<(), NotifyError> {
        tracing::warn!(guid, old_ip, new_ip, "Refresh from a new IP address");
        Ok(())
    }
}
