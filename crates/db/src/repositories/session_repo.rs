//! Repository for the `client_sessions` table.

use sqlx::PgPool;
use tollgate_core::Session;

use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "guid, refresh_secret_hash, expires_at, client_ip, created_at, updated_at";

/// Provides keyed access to client sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Find the session for a GUID, expired or not.
    pub async fn find_by_guid(pool: &PgPool, guid: &str) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_sessions WHERE guid = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(guid)
            .fetch_optional(pool)
            .await
    }

    /// Insert a session, or overwrite every field of the existing row for the
    /// same GUID.
    pub async fn upsert(pool: &PgPool, session: &Session) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_sessions (guid, refresh_secret_hash, expires_at, client_ip)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (guid) DO UPDATE SET
                refresh_secret_hash = EXCLUDED.refresh_secret_hash,
                expires_at = EXCLUDED.expires_at,
                client_ip = EXCLUDED.client_ip,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(&session.guid)
            .bind(&session.refresh_secret_hash)
            .bind(session.expires_at)
            .bind(&session.client_ip)
            .fetch_one(pool)
            .await
    }

    /// Rotate the refresh secret for `guid` if the stored hash still equals
    /// `expected_old_hash`. Returns `true` if the row was updated.
    ///
    /// The condition and the write are one statement, so two callers holding
    /// the same old hash cannot both succeed.
    pub async fn rotate_refresh_hash(
        pool: &PgPool,
        guid: &str,
        expected_old_hash: &str,
        new_session: &Session,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE client_sessions
             SET refresh_secret_hash = $1, expires_at = $2, client_ip = $3, updated_at = NOW()
             WHERE guid = $4 AND refresh_secret_hash = $5",
        )
        .bind(&new_session.refresh_secret_hash)
        .bind(new_session.expires_at)
        .bind(&new_session.client_ip)
        .bind(guid)
        .bind(expected_old_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
