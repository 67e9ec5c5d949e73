//! Row types returned by the entity stores
//!
//! Columns keep the Portuguese names of the persisted schema; the structs
//! mirror them one-to-one so `sqlx::FromRow` derives stay trivial.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row, including the password hash.
///
/// `senha` never serializes; handlers shape public DTOs from this.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha: String,
    pub biografia: Option<String>,
    pub url_foto: Option<String>,
    pub url_capa: Option<String>,
    pub localizacao: Option<String>,
    pub data_cadastro: Option<String>,
}

/// Public fields of a user, as returned by search and profile lookups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub nome: String,
    pub username: String,
    pub url_foto: Option<String>,
    pub biografia: Option<String>,
}

/// Aggregated per-user statistics.
///
/// `media_reviews` is 0.0 (not null) when the user has no reviews.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total_reviews: i64,
    pub media_reviews: f64,
    pub followers: i64,
    pub likes: i64,
    pub following: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Music {
    pub id: i64,
    pub nome: String,
    pub artista: String,
    pub album: String,
    pub data_lancamento: Option<String>,
    pub url_imagem: Option<String>,
}

/// Review joined with the music name and author display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: i64,
    /// Music display name (from the joined `musicas` row)
    pub musica: String,
    pub nota: f64,
    pub comentario: Option<String>,
    pub autor: String,
    pub autor_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct List {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    pub url_capa: Option<String>,
    pub publica: bool,
    pub data_criacao: Option<String>,
    pub usuario_id: i64,
}

/// List row with its membership count, as returned by `lists_for_user`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListSummary {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    pub url_capa: Option<String>,
    pub publica: bool,
    pub data_criacao: Option<String>,
    pub usuario_id: i64,
    pub song_count: i64,
}

/// One music inside a list, with its insertion timestamp.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListItem {
    pub id: i64,
    pub nome: String,
    pub artista: String,
    pub album: String,
    pub url_imagem: Option<String>,
    pub adicionado_em: String,
}
