// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "fitto_token";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub username: String,
    #[serde(rename = "setupComplete")]
    pub setup_complete: bool,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    /// As of when the token was issued
    pub setup_complete: bool,
}

/// Resolves a bearer credential into an identity.
///
/// Handlers and services only ever see the resulting `AuthUser`.
pub trait AuthGate: Send + Sync {
    /// `None` means no credential was presented.
    fn resolve(&self, credential: Option<&str>) -> Result<AuthUser, AppError>;
}

/// HS256 JWT verification.
pub struct JwtAuthGate {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthGate {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(signing_key),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl AuthGate for JwtAuthGate {
    fn resolve(&self, credential: Option<&str>) -> Result<AuthUser, AppError> {
        let token = credential.ok_or(AppError::Unauthenticated)?;

        let token_data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| AppError::InvalidCredential)?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::InvalidCredential);
        }

        Ok(AuthUser {
            user_id: token_data.claims.sub,
            username: token_data.claims.username,
            setup_complete: token_data.claims.setup_complete,
        })
    }
}

/// Pull the raw credential from the session cookie or the Authorization header.
///
/// A present but non-Bearer Authorization header is malformed, not missing.
fn extract_credential(jar: &CookieJar, request: &Request) -> Result<Option<String>, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Ok(Some(cookie.value().to_string()));
    }

    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| AppError::InvalidCredential)?,
        None => return Ok(None),
    };

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::InvalidCredential),
    }
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = extract_credential(&jar, &request)
        .and_then(|credential| state.auth_gate.resolve(credential.as_deref()))
        .inspect_err(|e| {
            tracing::warn!(
                path = %request.uri().path(),
                reason = e.code(),
                "Rejected request credential"
            );
        })?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(user: &User, signing_key: &[u8], ttl_secs: u64) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        setup_complete: user.setup_complete,
        iat: now,
        exp: now + ttl_secs as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
