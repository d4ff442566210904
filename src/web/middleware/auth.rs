use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use cookie::Cookie;
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Volunteer,
}

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// Volunteer id for volunteers, account id for admins.
    pub id: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Volunteers may only act for themselves; admins for anyone.
    pub fn can_act_for(&self, volunteer_id: &str) -> bool {
        self.is_admin() || self.id == volunteer_id
    }
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

pub fn access_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == ACCESS_TOKEN_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

/// Reads the payload segment of a `header.payload.signature` token. The
/// signature is checked by the auth service that issued the cookie.
pub fn decode_access_token(token: &str, now: i64) -> Option<AuthenticatedUser> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;
    let payload = serde_json::from_slice::<JwtPayload>(&payload_bytes).ok()?;

    if payload.sub.trim().is_empty() {
        return None;
    }
    if matches!(payload.exp, Some(exp) if exp <= now) {
        return None;
    }
    let role = match payload.role.as_deref() {
        Some("admin") => Role::Admin,
        _ => Role::Volunteer,
    };

    Some(AuthenticatedUser {
        id: payload.sub,
        role,
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user = access_token_from_headers(request.headers())
        .and_then(|token| decode_access_token(&token, unix_now()));

    let Some(user) = user else {
        debug!(path = %request.uri().path(), "require_auth: no valid access token");
        return Err(AppError::Unauthorized);
    };

    // Inject user into request extensions
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Must run inside `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return Err(AppError::Unauthorized);
    };
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
