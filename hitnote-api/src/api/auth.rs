//! Bearer-token identity resolution
//!
//! Extractors rather than a blanket middleware layer: most routes require
//! a caller, but a few (public profiles, another user's lists) only use
//! the identity when present. Token decode, claim extraction and the
//! user-still-exists re-fetch all collapse into one generic 401 so the
//! caller cannot tell which check failed.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use hitnote_common::auth::token::{credentials_error, decode_access_token};
use hitnote_common::db::models::User;
use hitnote_common::db::users;

use crate::api::ApiError;
use crate::AppState;

/// The authenticated caller. Rejects with 401 when the bearer token is
/// missing, invalid, expired, or its subject no longer exists.
pub struct CurrentUser(pub User);

/// Optional caller identity: `None` when no usable token was sent.
///
/// A malformed or expired token degrades to anonymous here instead of
/// failing the request; visibility decisions treat both the same.
pub struct MaybeUser(pub Option<User>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn resolve_user(state: &AppState, parts: &Parts) -> Result<User, ApiError> {
    let token = bearer_token(parts).ok_or_else(credentials_error)?;
    let claims = decode_access_token(&state.jwt_secret, token)?;

    // Re-fetch by subject to confirm the account still exists.
    users::get_user_by_email(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| ApiError(credentials_error()))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(state, parts).await.map(CurrentUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if bearer_token(parts).is_none() {
            return Ok(MaybeUser(None));
        }
        Ok(MaybeUser(resolve_user(state, parts).await.ok()))
    }
}
