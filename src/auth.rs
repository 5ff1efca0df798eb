use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::config::JwtConfig;
use crate::queries::users::{UserRow, get_user};
use crate::routes::AppState;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    pub iat: u64,
}

/// Generate a signed session token for the given user id
pub fn generate_token(config: &JwtConfig, sub: String) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub,
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a session token and return its claims
pub fn validate_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Build the HTTP-only session cookie for the given user id
pub fn build_auth_cookie<'a>(config: &JwtConfig, sub: String) -> anyhow::Result<Cookie<'a>> {
    let token = generate_token(config, sub)?;

    Ok(Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build())
}

/// Removal cookie that clears the session
pub fn clear_auth_cookie<'a>() -> Cookie<'a> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Authenticated user extractor
///
/// Validates the session cookie and verifies the user row still exists.
/// Unauthenticated requests are redirected to /login.
pub struct AuthUser(pub UserRow);

async fn authenticate(parts: &mut Parts, state: &AppState) -> Option<UserRow> {
    let jar = CookieJar::from_request_parts(parts, state).await.ok()?;
    let token = jar.get(AUTH_COOKIE_NAME).map(|cookie| cookie.value())?;

    let claims = validate_token(token, &state.config.jwt.secret).ok()?;

    match get_user(&state.pool, &claims.sub).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Database error resolving session user: {e}");
            None
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await {
            Some(user) => Ok(AuthUser(user)),
            None => Err(Redirect::to("/login")),
        }
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(authenticate(parts, state).await.map(AuthUser))
    }
}
