//! Client session row.

use sqlx::FromRow;
use tollgate_core::types::Timestamp;
use tollgate_core::Session;

/// A row from the `client_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub guid: String,
    pub refresh_secret_hash: String,
    pub expires_at: Timestamp,
    pub client_ip: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            guid: row.guid,
            refresh_secret_hash: row.refresh_secret_hash,
            expires_at: row.expires_at,
            client_ip: row.client_ip,
        }
    }
}
