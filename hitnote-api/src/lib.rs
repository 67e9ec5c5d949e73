//! hitnote-api library - HTTP boundary for the HitNote backend
//!
//! Thin plumbing over the entity stores in `hitnote-common`: route
//! registration, bearer-token identity resolution and the status-code
//! mapping (404 NotFound, 403 Forbidden, 401 Unauthorized, 400
//! InvalidInput/Conflict). All access-control decisions that need caller
//! identity happen here, above the stores.

use axum::Router;
use hitnote_common::db::Db;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod genius;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-call connection provider
    pub db: Db,
    /// HMAC secret for access tokens
    pub jwt_secret: Arc<Vec<u8>>,
    /// External metadata search client
    pub genius: genius::GeniusClient,
}

impl AppState {
    pub fn new(db: Db, jwt_secret: Vec<u8>, genius: genius::GeniusClient) -> Self {
        Self {
            db,
            jwt_secret: Arc::new(jwt_secret),
            genius,
        }
    }
}

/// Build the application router.
///
/// CORS is wide open, matching the original deployment where the frontend
/// is served from a different local origin.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health))
        // Accounts and sessions
        .route("/usuarios", post(api::users::register))
        .route("/login", post(api::users::login))
        .route("/usuarios/me", get(api::users::my_profile).put(api::users::update_my_profile))
        .route("/usuarios/busca", get(api::users::search))
        .route("/usuarios/me/curtidas", get(api::users::my_likes))
        .route("/usuarios/:id", get(api::users::public_profile))
        .route("/usuarios/:id/seguir", post(api::users::toggle_follow))
        .route("/usuarios/:id/curtidas", get(api::users::user_likes))
        .route("/usuarios/:id/listas", get(api::lists::user_lists))
        .route("/usuarios/:id/feed", get(api::feed::user_feed))
        // Catalogue
        .route("/musicas", get(api::music::list).post(api::music::create))
        .route(
            "/musicas/:id",
            get(api::music::get).put(api::music::update).delete(api::music::remove),
        )
        .route(
            "/musicas/:id/reviews",
            get(api::reviews::for_music).post(api::reviews::create),
        )
        .route("/musicas/:id/rating", get(api::music::rating))
        .route(
            "/musicas/:id/like",
            get(api::music::like_status).post(api::music::toggle_like),
        )
        // Playlists
        .route("/listas", post(api::lists::create))
        .route(
            "/listas/:id",
            get(api::lists::detail).put(api::lists::update).delete(api::lists::remove),
        )
        .route(
            "/listas/:lista_id/musicas/:musica_id",
            post(api::lists::add_music).delete(api::lists::remove_music),
        )
        // External metadata
        .route("/api/v1/search-genius", get(api::music::search_genius))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
