//! Activity feed aggregation
//!
//! Merges two ownership-scoped read paths, the user's reviews and the
//! lists they created, into one fixed-order sequence: up to 10 reviews
//! (most recent by id) followed by up to 5 lists (most recent by id),
//! truncated to 15 items. Reviews carry no creation timestamp, so this is
//! a concatenation, not a chronological merge.
//!
//! The feed backs a non-critical UI surface: any storage error degrades to
//! an empty feed instead of propagating (fail-open). Every other path in
//! the system fails closed.

use crate::db::Db;
use crate::Result;
use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;

const MAX_REVIEWS: i64 = 10;
const MAX_LISTS: i64 = 5;
const MAX_ITEMS: usize = 15;

/// One entry of a user's activity feed.
///
/// `id` is synthetic (`rev_<id>` / `list_<id>`) so the two sub-types stay
/// distinguishable in one sequence.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub id: String,
    pub tipo: String,
    pub acao: String,
    pub target_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comentario: Option<String>,
    pub data_criacao: Option<String>,
}

#[derive(FromRow)]
struct ReviewRow {
    id: i64,
    nota: f64,
    comentario: Option<String>,
    musica_nome: String,
    artista: String,
    musica_id: i64,
}

#[derive(FromRow)]
struct ListRow {
    id: i64,
    nome: String,
}

/// Recent activity for one user. Never fails; errors are logged and
/// degrade to an empty feed.
pub async fn user_feed(db: &Db, usuario_id: i64) -> Vec<ActivityItem> {
    match fetch_feed(db, usuario_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!("feed query failed for user {}: {}", usuario_id, e);
            Vec::new()
        }
    }
}

async fn fetch_feed(db: &Db, usuario_id: i64) -> Result<Vec<ActivityItem>> {
    let mut conn = db.open().await?;

    let reviews = sqlx::query_as::<_, ReviewRow>(
        "SELECT r.id, r.nota, r.comentario, m.nome AS musica_nome, m.artista, \
         m.id AS musica_id \
         FROM reviews r JOIN musicas m ON r.musica_id = m.id \
         WHERE r.usuario_id = ? ORDER BY r.id DESC LIMIT ?",
    )
    .bind(usuario_id)
    .bind(MAX_REVIEWS)
    .fetch_all(&mut conn)
    .await?;

    let lists = sqlx::query_as::<_, ListRow>(
        "SELECT id, nome FROM listas WHERE usuario_id = ? ORDER BY id DESC LIMIT ?",
    )
    .bind(usuario_id)
    .bind(MAX_LISTS)
    .fetch_all(&mut conn)
    .await?;

    let mut feed = Vec::with_capacity(reviews.len() + lists.len());

    for r in reviews {
        feed.push(ActivityItem {
            id: format!("rev_{}", r.id),
            tipo: "review".to_string(),
            acao: format!("avaliou a música {} ({})", r.musica_nome, r.artista),
            target_id: r.musica_id,
            nota: Some(r.nota),
            comentario: r.comentario,
            data_criacao: None,
        });
    }

    for l in lists {
        feed.push(ActivityItem {
            id: format!("list_{}", l.id),
            tipo: "list_create".to_string(),
            acao: format!("criou a nova lista '{}'", l.nome),
            target_id: l.id,
            nota: None,
            comentario: None,
            data_criacao: None,
        });
    }

    feed.truncate(MAX_ITEMS);
    Ok(feed)
}
