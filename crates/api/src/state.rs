use std::sync::Arc;

use tollgate_core::SessionManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by the client-IP extractor).
    pub config: Arc<ServerConfig>,
    /// Token issuance and refresh.
    pub sessions: Arc<SessionManager>,
}
