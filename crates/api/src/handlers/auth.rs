//! Handlers for the `/auth` resource (token, refresh, me).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tollgate_core::secret::decode_secret;
use tollgate_core::types::Timestamp;
use tollgate_core::IssuedTokens;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthClient;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string carrying the client GUID.
#[derive(Debug, Deserialize)]
pub struct GuidQuery {
    pub guid: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Response body for token issuance and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub guid: String,
    /// IP address the access token was issued to.
    pub client_ip: String,
    pub expires_at: Timestamp,
    /// Whether the caller's current IP equals the one bound into the token.
    pub ip_matches: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/token?guid=
///
/// Issues a fresh token pair, replacing any session the GUID already has.
pub async fn issue_token(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Query(query): Query<GuidQuery>,
) -> AppResult<Json<TokenResponse>> {
    let guid = require_guid(query)?;
    let tokens = state.sessions.issue(&guid, &client_ip).await?;
    Ok(Json(token_response(&state, tokens)))
}

/// POST /api/v1/auth/refresh?guid=
///
/// Exchanges the current refresh token for a new pair. The old refresh token
/// stops working once this returns.
pub async fn refresh(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Query(query): Query<GuidQuery>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let guid = require_guid(query)?;
    let input = match body {
        Ok(Json(input)) => input,
        // A bodyless request carries no token at all.
        Err(JsonRejection::MissingJsonContentType(_)) => RefreshRequest::default(),
        Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
    };
    let raw_secret = decode_secret(&input.refresh_token)?;

    let tokens = state
        .sessions
        .refresh(&raw_secret, &guid, &client_ip)
        .await?;
    Ok(Json(token_response(&state, tokens)))
}

/// GET /api/v1/auth/me
pub async fn me(client: AuthClient, ClientIp(client_ip): ClientIp) -> Json<MeResponse> {
    let expires_at = client.claims.expires_at();
    let ip_matches = client.claims.ip == client_ip;
    Json(MeResponse {
        guid: client.claims.sub,
        client_ip: client.claims.ip,
        expires_at,
        ip_matches,
    })
}

fn require_guid(query: GuidQuery) -> AppResult<String> {
    query
        .guid
        .filter(|g| !g.is_empty())
        .ok_or_else(|| AppError::BadRequest("guid is empty".into()))
}

fn token_response(state: &AppState, tokens: IssuedTokens) -> TokenResponse {
    TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: state.sessions.access_token_ttl().num_seconds(),
    }
}
