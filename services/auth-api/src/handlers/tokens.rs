//! Token lifecycle handlers (issue, refresh, logout, whoami)

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use vigil_types::{TokenPair, UserId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IssueParams {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            token_type: pair.token_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub user_id: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/auth/tokens?user_id=...
///
/// Issue a fresh credential pair for a user with no active session.
pub async fn issue(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<IssueParams>,
) -> ApiResult<Json<TokenPairResponse>> {
    let (user_agent, source_ip) = client_info(&headers, &addr);
    let user_id = UserId::new(params.user_id);

    let pair = state
        .lifecycle
        .issue(&user_id, &user_agent, &source_ip)
        .await?;

    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/tokens/refresh
///
/// Exchange a valid credential pair for a new one.
pub async fn refresh(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPairResponse>> {
    let (user_agent, source_ip) = client_info(&headers, &addr);

    let pair = state
        .lifecycle
        .rotate(&req.access_token, &req.refresh_token, &user_agent, &source_ip)
        .await?;

    Ok(Json(pair.into()))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented access credential and terminate the session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let access_token = bearer_token(&headers)?;

    let user_id = state.lifecycle.check_validity(access_token).await?;
    state.lifecycle.logout(access_token, &user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/whoami
///
/// Return the user id asserted by the presented access credential.
pub async fn whoami(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<WhoamiResponse>> {
    let access_token = bearer_token(&headers)?;

    let user_id = state.lifecycle.check_validity(access_token).await?;

    Ok(Json(WhoamiResponse {
        user_id: user_id.to_string(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

fn client_info(headers: &HeaderMap, addr: &SocketAddr) -> (String, String) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    (user_agent, addr.ip().to_string())
}

fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::MissingBearer)
}
