//! Playlist endpoints
//!
//! The stores return one boolean for ownership-conditioned mutations, so
//! this layer performs the follow-up existence check to answer 404 for a
//! missing list and 403 for someone else's. Membership endpoints verify
//! ownership here before touching the store, which itself checks nothing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hitnote_common::db::models::{List, ListItem, ListSummary};
use hitnote_common::db::{lists, music, users};
use hitnote_common::Error;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, CurrentUser, MaybeUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListaIn {
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default = "default_publica")]
    pub publica: bool,
}

fn default_publica() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ListaFull {
    #[serde(flatten)]
    pub lista: List,
    pub song_count: i64,
    pub items: Vec<ListItem>,
}

fn not_found() -> ApiError {
    ApiError(Error::NotFound("Lista não encontrada".to_string()))
}

fn forbidden() -> ApiError {
    ApiError(Error::Forbidden("Você não é dono desta lista".to_string()))
}

/// Disambiguate a rejected ownership-conditioned mutation: 404 when the
/// list never existed, 403 when it belongs to someone else.
async fn rejection(state: &AppState, lista_id: i64) -> ApiError {
    match lists::get_list(&state.db, lista_id).await {
        Ok(Some(_)) => forbidden(),
        Ok(None) => not_found(),
        Err(e) => ApiError(e),
    }
}

/// Fetch a list and require that `usuario_id` owns it.
async fn require_owned(
    state: &AppState,
    lista_id: i64,
    usuario_id: i64,
) -> Result<List, ApiError> {
    let list = lists::get_list(&state.db, lista_id).await?.ok_or_else(not_found)?;
    if list.usuario_id != usuario_id {
        return Err(forbidden());
    }
    Ok(list)
}

/// POST /listas
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ListaIn>,
) -> Result<(StatusCode, Json<ListSummary>), ApiError> {
    if body.nome.trim().is_empty() {
        return Err(Error::InvalidInput("Nome da lista é obrigatório".to_string()).into());
    }

    let lista_id =
        lists::create_list(&state.db, user.id, &body.nome, &body.descricao, body.publica)
            .await?;

    let list = lists::get_list(&state.db, lista_id).await?.ok_or_else(not_found)?;
    Ok((
        StatusCode::CREATED,
        Json(ListSummary {
            id: list.id,
            nome: list.nome,
            descricao: list.descricao,
            url_capa: list.url_capa,
            publica: list.publica,
            data_criacao: list.data_criacao,
            usuario_id: list.usuario_id,
            song_count: 0,
        }),
    ))
}

/// GET /listas/:id
///
/// Private lists are a privacy-sensitive read: only the owner may open
/// one. Public lists need no token.
pub async fn detail(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<ListaFull>, ApiError> {
    let list = lists::get_list(&state.db, id).await?.ok_or_else(not_found)?;

    if !list.publica && viewer.as_ref().map(|v| v.id) != Some(list.usuario_id) {
        return Err(forbidden());
    }

    let items = lists::musics_in_list(&state.db, id).await?;
    let song_count = items.len() as i64;

    Ok(Json(ListaFull {
        lista: list,
        song_count,
        items,
    }))
}

/// PUT /listas/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<ListaIn>,
) -> Result<Json<ListSummary>, ApiError> {
    let changed =
        lists::edit_list(&state.db, id, user.id, &body.nome, &body.descricao, body.publica)
            .await?;

    if !changed {
        return Err(rejection(&state, id).await);
    }

    let list = lists::get_list(&state.db, id).await?.ok_or_else(not_found)?;
    let song_count = lists::song_count(&state.db, id).await?;

    Ok(Json(ListSummary {
        id: list.id,
        nome: list.nome,
        descricao: list.descricao,
        url_capa: list.url_capa,
        publica: list.publica,
        data_criacao: list.data_criacao,
        usuario_id: list.usuario_id,
        song_count,
    }))
}

/// DELETE /listas/:id
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !lists::delete_list(&state.db, id, user.id).await? {
        return Err(rejection(&state, id).await);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /listas/:lista_id/musicas/:musica_id
pub async fn add_music(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((lista_id, musica_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    require_owned(&state, lista_id, user.id).await?;

    if music::get_music(&state.db, musica_id).await?.is_none() {
        return Err(Error::NotFound("Música não encontrada".to_string()).into());
    }

    lists::add_music(&state.db, lista_id, musica_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /listas/:lista_id/musicas/:musica_id
pub async fn remove_music(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((lista_id, musica_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    require_owned(&state, lista_id, user.id).await?;
    lists::remove_music(&state.db, lista_id, musica_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /usuarios/:id/listas
///
/// Anyone but the owner sees only public lists.
pub async fn user_lists(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ListSummary>>, ApiError> {
    if users::get_user_by_id(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Usuário não encontrado".to_string()).into());
    }

    let only_public = viewer.as_ref().map(|v| v.id) != Some(id);
    Ok(Json(lists::lists_for_user(&state.db, id, only_public).await?))
}
