//! Token engine: signed, expiring bearer credentials
//!
//! Tokens are HS256 JWTs carrying the subject (email), the numeric user id
//! and an absolute expiry. Every decode failure (bad signature, expiry,
//! malformed claims) collapses into one generic `Unauthorized`; the design
//! intentionally avoids leaking which check failed.

use crate::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Route-facing token lifetime, in minutes. This is the authoritative
/// default: the login handler always passes it explicitly.
///
/// `create_access_token` has its own inner fallback of 15 minutes when no
/// lifetime is supplied. The two defaults disagree on purpose: both code
/// paths existed upstream and the discrepancy is kept visible rather than
/// silently unified (see token tests).
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

const INNER_DEFAULT_MINUTES: i64 = 15;

const GENERIC_DETAIL: &str = "Não foi possível validar as credenciais";

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Numeric user id
    pub id: i64,
    /// Absolute expiry (Unix seconds)
    pub exp: i64,
}

/// Issue a signed token for `sub`/`user_id`.
///
/// Falls back to the 15-minute inner default when `expires` is `None`.
pub fn create_access_token(
    secret: &[u8],
    sub: &str,
    user_id: i64,
    expires: Option<Duration>,
) -> Result<String> {
    let delta = expires.unwrap_or_else(|| Duration::minutes(INNER_DEFAULT_MINUTES));
    let claims = Claims {
        sub: sub.to_string(),
        id: user_id,
        exp: (Utc::now() + delta).timestamp(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
}

/// Verify signature and expiry, returning the claims.
///
/// Callers must still re-fetch the user by `sub` to confirm the account
/// exists; an absent account collapses into the same `Unauthorized`.
pub fn decode_access_token(secret: &[u8], token: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|_| Error::Unauthorized(GENERIC_DETAIL.to_string()))?;

    // Strict boundary: the library accepts exp == now, so a token issued
    // with ttl=0 would survive for the rest of that second.
    if claims.exp <= Utc::now().timestamp() {
        return Err(Error::Unauthorized(GENERIC_DETAIL.to_string()));
    }

    Ok(claims)
}

/// The generic credential-failure detail shared by every auth error path.
pub fn credentials_error() -> Error {
    Error::Unauthorized(GENERIC_DETAIL.to_string())
}
