//! Account, session, profile, follow and like endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;
use hitnote_common::auth::password::{hash_password, verify_password};
use hitnote_common::auth::token::{create_access_token, ACCESS_TOKEN_EXPIRE_MINUTES};
use hitnote_common::db::models::{Music, PublicUser, User, UserStats};
use hitnote_common::db::users;
use hitnote_common::Error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiError, CurrentUser, MaybeUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub nome: String,
    pub username: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Serialize)]
pub struct UsuarioOut {
    pub id: i64,
    pub nome: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UsuarioOut {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            nome: u.nome.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
        }
    }
}

/// Full own-profile payload, stats included.
#[derive(Debug, Serialize)]
pub struct UsuarioFull {
    pub id: i64,
    pub nome: String,
    pub username: String,
    pub email: String,
    pub biografia: String,
    pub url_foto: String,
    pub url_capa: String,
    pub localizacao: String,
    pub data_cadastro: String,
    pub stats: UserStats,
}

impl UsuarioFull {
    fn new(u: User, stats: UserStats) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            username: u.username,
            email: u.email,
            biografia: u.biografia.unwrap_or_default(),
            url_foto: u.url_foto.unwrap_or_default(),
            url_capa: u.url_capa.unwrap_or_default(),
            localizacao: u.localizacao.unwrap_or_default(),
            data_cadastro: u.data_cadastro.unwrap_or_default(),
            stats,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub nome: String,
    #[serde(default)]
    pub biografia: String,
    #[serde(default)]
    pub url_foto: String,
    #[serde(default)]
    pub url_capa: String,
    #[serde(default)]
    pub localizacao: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// POST /usuarios
///
/// The pre-check on email keeps the common case friendly; the UNIQUE
/// constraint in the store is the backstop for the race window.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UsuarioOut>), ApiError> {
    if body.nome.trim().is_empty() || body.email.trim().is_empty() || body.senha.is_empty() {
        return Err(Error::InvalidInput("Campos obrigatórios ausentes".to_string()).into());
    }

    if users::get_user_by_email(&state.db, &body.email).await?.is_some() {
        return Err(Error::Conflict("Email já cadastrado".to_string()).into());
    }

    let senha_hash = hash_password(&body.senha)?;
    let user =
        users::create_user(&state.db, &body.nome, &body.username, &body.email, &senha_hash)
            .await?;

    Ok((StatusCode::CREATED, Json(UsuarioOut::from(&user))))
}

/// POST /login
///
/// Absent account and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let bad_credentials = || Error::Unauthorized("Email ou senha incorretos".to_string());

    let user = users::get_user_by_email(&state.db, &body.email)
        .await?
        .ok_or_else(bad_credentials)?;

    if !verify_password(&body.senha, &user.senha)? {
        return Err(bad_credentials().into());
    }

    let token = create_access_token(
        &state.jwt_secret,
        &user.email,
        user.id,
        Some(Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES)),
    )?;

    Ok(Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "usuario": UsuarioOut::from(&user),
    })))
}

/// GET /usuarios/me
pub async fn my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UsuarioFull>, ApiError> {
    let stats = users::user_stats(&state.db, user.id).await?;
    Ok(Json(UsuarioFull::new(user, stats)))
}

/// PUT /usuarios/me
pub async fn update_my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<UsuarioFull>, ApiError> {
    let updated = users::update_profile(
        &state.db,
        user.id,
        &body.nome,
        &body.biografia,
        &body.url_foto,
        &body.url_capa,
        &body.localizacao,
    )
    .await?;

    let stats = users::user_stats(&state.db, updated.id).await?;
    Ok(Json(UsuarioFull::new(updated, stats)))
}

/// GET /usuarios/busca?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    Ok(Json(users::search_users(&state.db, &params.q).await?))
}

/// GET /usuarios/:id
///
/// Public profile with `is_following` computed relative to the viewer
/// (absent without a token).
pub async fn public_profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = users::get_user_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::NotFound("Usuário não encontrado".to_string()))?;

    let is_following = match &viewer {
        Some(v) if v.id != user.id => {
            Some(users::is_following(&state.db, v.id, user.id).await?)
        }
        _ => None,
    };

    let stats = users::user_stats(&state.db, user.id).await?;

    Ok(Json(json!({
        "id": user.id,
        "nome": user.nome,
        "username": user.username,
        "url_foto": user.url_foto.unwrap_or_default(),
        "biografia": user.biografia.unwrap_or_default(),
        "url_capa": user.url_capa.unwrap_or_default(),
        "localizacao": user.localizacao.unwrap_or_default(),
        "is_following": is_following,
        "stats": {
            "followers": stats.followers,
            "following": stats.following,
        },
    })))
}

/// POST /usuarios/:id/seguir
pub async fn toggle_follow(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if users::get_user_by_id(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Usuário não encontrado".to_string()).into());
    }

    let is_following = users::toggle_follow(&state.db, actor.id, id).await?;
    Ok(Json(json!({ "is_following": is_following })))
}

/// GET /usuarios/me/curtidas
pub async fn my_likes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Music>>, ApiError> {
    Ok(Json(users::liked_musics(&state.db, user.id).await?))
}

/// GET /usuarios/:id/curtidas
pub async fn user_likes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Music>>, ApiError> {
    if users::get_user_by_id(&state.db, id).await?.is_none() {
        return Err(Error::NotFound("Usuário não encontrado".to_string()).into());
    }
    Ok(Json(users::liked_musics(&state.db, id).await?))
}
