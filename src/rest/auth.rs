//! Login, registration and the session-token extractor.
use anyhow::anyhow;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::rest::{AppJson, AppState};

const AUTH_COOKIE_NAME: &str = "session_token";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
}

/// The admin behind a valid session token. Handlers that merely want to know
/// whether a caller is logged in take `Option<AuthenticatedUser>`.
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let claims = token_from_headers(&parts.headers)
            .and_then(|token| app.auth_service.verify_token(&token))
            .ok_or(AppError::InvalidCredentials)?;
        Ok(AuthenticatedUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

/// Pull a session token from either the Authorization header or the session
/// cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == AUTH_COOKIE_NAME).then(|| value.to_string())
    })
}

fn session_cookie(token: &str) -> String {
    // 12h, matching the token lifetime.
    format!("{AUTH_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=43200")
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Response> {
    info!("POST /login - username: {}", request.username);

    let (_admin, token) = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    let mut response = (
        StatusCode::OK,
        Json(json!({ "message": "Login successful" })),
    )
        .into_response();
    let cookie = HeaderValue::from_str(&session_cookie(&token))
        .map_err(|e| anyhow!("session cookie construction failed: {e}"))?;
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AdminResponse>)> {
    info!("POST /register - username: {}", request.username);

    let admin = state
        .auth_service
        .register(&request.username, &request.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            id: admin.id,
            username: admin.username,
        }),
    ))
}
