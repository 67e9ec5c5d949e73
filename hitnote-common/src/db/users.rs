//! User store: accounts, profiles, follow and like edges, statistics
//!
//! Mutations on profile fields are ownership-scoped by construction: the
//! HTTP layer only ever passes the authenticated caller's id. Follow and
//! like toggles are check-then-act with no compare-and-swap; concurrent
//! duplicate toggles from the same actor can each flip state. That race is
//! documented, not fixed, since no lock manager exists.

use crate::db::models::{Music, PublicUser, User, UserStats};
use crate::db::Db;
use crate::{Error, Result};

const SELECT_USER: &str = "SELECT id, nome, username, email, senha, biografia, url_foto, \
     url_capa, localizacao, data_cadastro FROM usuarios";

/// Insert a new account and return the stored row.
///
/// Callers pre-check email existence and surface `Conflict` themselves,
/// but the UNIQUE constraint on email is still mapped here: the window
/// between the pre-check and the insert is not atomic.
pub async fn create_user(
    db: &Db,
    nome: &str,
    username: &str,
    email: &str,
    senha_hash: &str,
) -> Result<User> {
    let mut conn = db.open().await?;

    let result = sqlx::query(
        "INSERT INTO usuarios (nome, username, email, senha) VALUES (?, ?, ?, ?)",
    )
    .bind(nome)
    .bind(username)
    .bind(email)
    .bind(senha_hash)
    .execute(&mut conn)
    .await
    .map_err(|e| Error::conflict_on_unique(e, "Email já cadastrado"))?;

    let user = sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(result.last_insert_rowid())
        .fetch_one(&mut conn)
        .await?;

    Ok(user)
}

pub async fn get_user_by_id(db: &Db, id: i64) -> Result<Option<User>> {
    let mut conn = db.open().await?;

    let user = sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

    Ok(user)
}

pub async fn get_user_by_email(db: &Db, email: &str) -> Result<Option<User>> {
    let mut conn = db.open().await?;

    let user = sqlx::query_as::<_, User>(&format!("{} WHERE email = ?", SELECT_USER))
        .bind(email)
        .fetch_optional(&mut conn)
        .await?;

    Ok(user)
}

/// Update the caller's own profile fields and return the fresh row.
pub async fn update_profile(
    db: &Db,
    id: i64,
    nome: &str,
    biografia: &str,
    url_foto: &str,
    url_capa: &str,
    localizacao: &str,
) -> Result<User> {
    let mut conn = db.open().await?;

    sqlx::query(
        "UPDATE usuarios SET nome = ?, biografia = ?, url_foto = ?, url_capa = ?, \
         localizacao = ? WHERE id = ?",
    )
    .bind(nome)
    .bind(biografia)
    .bind(url_foto)
    .bind(url_capa)
    .bind(localizacao)
    .bind(id)
    .execute(&mut conn)
    .await?;

    sqlx::query_as::<_, User>(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| Error::NotFound("Usuário não encontrado".to_string()))
}

/// Search users by name or username (public fields only).
pub async fn search_users(db: &Db, q: &str) -> Result<Vec<PublicUser>> {
    let mut conn = db.open().await?;
    let like = format!("%{}%", q.trim());

    let users = sqlx::query_as::<_, PublicUser>(
        "SELECT id, nome, username, url_foto, biografia FROM usuarios \
         WHERE nome LIKE ? OR username LIKE ? ORDER BY nome COLLATE NOCASE LIMIT 20",
    )
    .bind(&like)
    .bind(&like)
    .fetch_all(&mut conn)
    .await?;

    Ok(users)
}

/// Flip the follow edge from `actor` to `target` and return the new state
/// (true = now following). Self-follow is rejected.
pub async fn toggle_follow(db: &Db, actor_id: i64, target_id: i64) -> Result<bool> {
    if actor_id == target_id {
        return Err(Error::InvalidInput(
            "Você não pode seguir a si mesmo".to_string(),
        ));
    }

    let mut conn = db.open().await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM seguidores WHERE seguidor_id = ? AND seguido_id = ?)",
    )
    .bind(actor_id)
    .bind(target_id)
    .fetch_one(&mut conn)
    .await?;

    if exists {
        sqlx::query("DELETE FROM seguidores WHERE seguidor_id = ? AND seguido_id = ?")
            .bind(actor_id)
            .bind(target_id)
            .execute(&mut conn)
            .await?;
        Ok(false)
    } else {
        sqlx::query("INSERT OR IGNORE INTO seguidores (seguidor_id, seguido_id) VALUES (?, ?)")
            .bind(actor_id)
            .bind(target_id)
            .execute(&mut conn)
            .await?;
        Ok(true)
    }
}

pub async fn is_following(db: &Db, actor_id: i64, target_id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM seguidores WHERE seguidor_id = ? AND seguido_id = ?)",
    )
    .bind(actor_id)
    .bind(target_id)
    .fetch_one(&mut conn)
    .await?;

    Ok(exists)
}

/// Flip the like edge from `actor` to a music and return the new state
/// (true = now liked). Same check-then-act contract as `toggle_follow`.
pub async fn toggle_like(db: &Db, actor_id: i64, musica_id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM curtidas WHERE usuario_id = ? AND musica_id = ?)",
    )
    .bind(actor_id)
    .bind(musica_id)
    .fetch_one(&mut conn)
    .await?;

    if exists {
        sqlx::query("DELETE FROM curtidas WHERE usuario_id = ? AND musica_id = ?")
            .bind(actor_id)
            .bind(musica_id)
            .execute(&mut conn)
            .await?;
        Ok(false)
    } else {
        sqlx::query("INSERT OR IGNORE INTO curtidas (usuario_id, musica_id) VALUES (?, ?)")
            .bind(actor_id)
            .bind(musica_id)
            .execute(&mut conn)
            .await?;
        Ok(true)
    }
}

pub async fn is_liked(db: &Db, actor_id: i64, musica_id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM curtidas WHERE usuario_id = ? AND musica_id = ?)",
    )
    .bind(actor_id)
    .bind(musica_id)
    .fetch_one(&mut conn)
    .await?;

    Ok(exists)
}

/// All musics a user has liked.
pub async fn liked_musics(db: &Db, usuario_id: i64) -> Result<Vec<Music>> {
    let mut conn = db.open().await?;

    let musics = sqlx::query_as::<_, Music>(
        "SELECT m.id, m.nome, m.artista, m.album, m.data_lancamento, m.url_imagem \
         FROM musicas m JOIN curtidas c ON c.musica_id = m.id \
         WHERE c.usuario_id = ? ORDER BY m.id DESC",
    )
    .bind(usuario_id)
    .fetch_all(&mut conn)
    .await?;

    Ok(musics)
}

/// Compute per-user aggregates with independent reads.
///
/// The average rating defaults to 0.0 when the user has no reviews, so a
/// null never propagates to the profile payload.
pub async fn user_stats(db: &Db, usuario_id: i64) -> Result<UserStats> {
    let mut conn = db.open().await?;

    let total_reviews: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE usuario_id = ?")
            .bind(usuario_id)
            .fetch_one(&mut conn)
            .await?;

    let media_reviews: Option<f64> =
        sqlx::query_scalar("SELECT AVG(nota) FROM reviews WHERE usuario_id = ?")
            .bind(usuario_id)
            .fetch_one(&mut conn)
            .await?;

    let followers: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM seguidores WHERE seguido_id = ?")
            .bind(usuario_id)
            .fetch_one(&mut conn)
            .await?;

    let following: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM seguidores WHERE seguidor_id = ?")
            .bind(usuario_id)
            .fetch_one(&mut conn)
            .await?;

    let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM curtidas WHERE usuario_id = ?")
        .bind(usuario_id)
        .fetch_one(&mut conn)
        .await?;

    Ok(UserStats {
        total_reviews,
        media_reviews: media_reviews.unwrap_or(0.0),
        followers,
        likes,
        following,
    })
}
