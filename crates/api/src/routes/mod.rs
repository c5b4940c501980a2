pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/token?guid=        issue a token pair (public)
/// /auth/refresh?guid=      rotate a token pair (public, refresh token in body)
/// /auth/me                 inspect the bearer access token
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
