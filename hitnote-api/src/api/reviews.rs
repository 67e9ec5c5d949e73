//! Review endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hitnote_common::db::models::Review;
use hitnote_common::db::{music, reviews};
use hitnote_common::Error;
use serde::Deserialize;

use crate::api::{ApiError, CurrentUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewIn {
    pub nota: f64,
    #[serde(default)]
    pub comentario: String,
}

/// GET /musicas/:id/reviews
pub async fn for_music(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Review>>, ApiError> {
    if music::get_music(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Música não encontrada".to_string()).into());
    }
    Ok(Json(reviews::reviews_for_music(&state.db, id).await?))
}

/// POST /musicas/:id/reviews
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<ReviewIn>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    if !(0.0..=5.0).contains(&body.nota) {
        return Err(Error::InvalidInput("Nota deve estar entre 0 e 5".to_string()).into());
    }
    if music::get_music(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Música não encontrada".to_string()).into());
    }

    let review =
        reviews::create_review(&state.db, id, body.nota, &body.comentario, user.id).await?;

    Ok((StatusCode::CREATED, Json(review)))
}
