use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /token      issue_token
/// POST /refresh    refresh
/// GET  /me         me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(auth::issue_token))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::me))
}
