//! hitnote-api - HitNote backend HTTP server
//!
//! Music catalogue and social review API: accounts, star-rated reviews,
//! follows, likes, playlists and a per-user activity feed, backed by a
//! single-file SQLite store.

use anyhow::Result;
use hitnote_api::{build_router, genius::GeniusClient, AppState};
use hitnote_common::config::Config;
use hitnote_common::db::{init, Db};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting HitNote API v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!("Database path: {}", config.db_path.display());

    let db = Db::new(&config.db_path);
    init::create_all_tables(&db).await?;

    let genius = GeniusClient::new(
        config.genius_api_url.clone(),
        config.genius_access_token.clone(),
    );
    let state = AppState::new(db, config.jwt_secret.clone().into_bytes(), genius);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("hitnote-api listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
