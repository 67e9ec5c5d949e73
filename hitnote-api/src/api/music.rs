//! Catalogue endpoints: paginated search, dedup-create, CRUD, likes,
//! rating, and the external metadata search

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hitnote_common::db::models::Music;
use hitnote_common::db::{music, users};
use hitnote_common::Error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiError, CurrentUser};
use crate::genius::GeniusResult;
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct MusicaIn {
    pub nome: String,
    pub artista: String,
    pub album: String,
    #[serde(default)]
    pub data_lancamento: String,
    #[serde(default)]
    pub url_imagem: String,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MusicaPage {
    pub items: Vec<Music>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct GeniusQuery {
    pub query: String,
}

async fn require_music(state: &AppState, id: i64) -> Result<Music, ApiError> {
    music::get_music(&state.db, id)
        .await?
        .ok_or_else(|| ApiError(Error::NotFound("Música não encontrada".to_string())))
}

/// GET /musicas
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<MusicaPage>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let order = params.order.as_deref().unwrap_or("id_desc");
    let q = params.q.as_deref();

    // Saturating: an absurd page number yields an empty page, not a panic.
    let offset = page.saturating_sub(1).saturating_mul(page_size);

    let total = music::count_search(&state.db, q).await?;
    let items = music::search_musics(&state.db, q, order, page_size, offset).await?;

    Ok(Json(MusicaPage {
        items,
        total,
        page,
        page_size,
    }))
}

/// POST /musicas
///
/// Dedup-create: a triple match returns the existing row with 201 all the
/// same, so callers can treat the operation as idempotent.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<MusicaIn>,
) -> Result<(StatusCode, Json<Music>), ApiError> {
    if body.nome.trim().is_empty() || body.artista.trim().is_empty() {
        return Err(Error::InvalidInput("Nome e artista são obrigatórios".to_string()).into());
    }

    let created = music::create_music(
        &state.db,
        &body.nome,
        &body.artista,
        &body.album,
        &body.data_lancamento,
        &body.url_imagem,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /musicas/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Music>, ApiError> {
    Ok(Json(require_music(&state, id).await?))
}

/// PUT /musicas/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<MusicaIn>,
) -> Result<Json<Music>, ApiError> {
    let changed = music::update_music(
        &state.db,
        id,
        &body.nome,
        &body.artista,
        &body.album,
        &body.data_lancamento,
        &body.url_imagem,
    )
    .await?;

    if !changed {
        return Err(Error::NotFound("Música não encontrada".to_string()).into());
    }

    Ok(Json(require_music(&state, id).await?))
}

/// DELETE /musicas/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !music::delete_music(&state.db, id).await? {
        return Err(Error::NotFound("Música não encontrada".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /musicas/:id/rating
pub async fn rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_music(&state, id).await?;
    let (media, qtde) = music::rating(&state.db, id).await?;

    Ok(Json(json!({
        "musica_id": id,
        "media": media,
        "qtde": qtde,
    })))
}

/// GET /musicas/:id/like
pub async fn like_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_music(&state, id).await?;
    let is_liked = users::is_liked(&state.db, user.id, id).await?;
    Ok(Json(json!({ "is_liked": is_liked })))
}

/// POST /musicas/:id/like
pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_music(&state, id).await?;
    let is_liked = users::toggle_like(&state.db, user.id, id).await?;
    Ok(Json(json!({ "is_liked": is_liked })))
}

/// GET /api/v1/search-genius?query=
pub async fn search_genius(
    State(state): State<AppState>,
    Query(params): Query<GeniusQuery>,
) -> Result<Json<Vec<GeniusResult>>, ApiError> {
    Ok(Json(state.genius.search(&params.query).await?))
}
