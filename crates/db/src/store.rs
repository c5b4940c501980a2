use async_trait::async_trait;
use tollgate_core::{CoreError, Session, SessionStore};

use crate::repositories::SessionRepo;
use crate::DbPool;

/// [`SessionStore`] backed by the `client_sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Session store query failed");
    CoreError::Persistence(err.to_string())
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, guid: &str) -> Result<Session, CoreError> {
        SessionRepo::find_by_guid(&self.pool, guid)
            .await
            .map_err(persistence)?
            .map(Session::from)
            .ok_or(CoreError::NotFound)
    }

    async fn upsert(&self, session: &Session) -> Result<(), CoreError> {
        SessionRepo::upsert(&self.pool, session)
            .await
            .map_err(persistence)?;
        Ok(())
    }

    async fn compare_and_swap_refresh_hash(
        &self,
        guid: &str,
        expected_old_hash: &str,
        new_session: &Session,
    ) -> Result<(), CoreError> {
        let updated =
            SessionRepo::rotate_refresh_hash(&self.pool, guid, expected_old_hash, new_session)
                .await
                .map_err(persistence)?;
        if updated {
            Ok(())
        } else {
            Err(CoreError::Conflict)
        }
    }
}
