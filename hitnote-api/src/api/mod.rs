//! HTTP handlers

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hitnote_common::Error;
use serde_json::json;
use tracing::error;

pub mod auth;
pub mod feed;
pub mod lists;
pub mod music;
pub mod reviews;
pub mod users;

pub use auth::{CurrentUser, MaybeUser};

/// Wrapper giving the common error taxonomy an HTTP shape.
///
/// Bodies follow the `{"detail": ...}` convention the frontend consumes.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            // Validation failures and conflicts both map to 400.
            Error::InvalidInput(msg) | Error::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Error::Database(e) => {
                error!("storage failure reached the HTTP boundary: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno".to_string())
            }
            Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                error!("internal failure: {}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno".to_string())
            }
        };

        let body = Json(json!({ "detail": detail }));

        if status == StatusCode::UNAUTHORIZED {
            // Bearer challenge, as the token contract requires.
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "hitnote-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
