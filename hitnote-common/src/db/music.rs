//! Music store: catalogue CRUD, dedup-by-triple, search and pagination
//!
//! Deduplication identity is the case-insensitive (nome, artista, album)
//! triple, resolved by read-then-maybe-write. There is no uniqueness
//! constraint backing it, so two racing creators can still insert twice;
//! the catalogue tolerates that, matching the original contract.

use crate::db::models::Music;
use crate::db::Db;
use crate::Result;

const SELECT_MUSIC: &str =
    "SELECT id, nome, artista, album, data_lancamento, url_imagem FROM musicas";

/// Sort orders accepted by [`search_musics`]. Anything else falls back to
/// `id_desc`. Whitelisting keeps user input out of the ORDER BY clause.
fn order_sql(order: &str) -> &'static str {
    match order {
        "id_asc" => "id ASC",
        "nome_asc" => "nome COLLATE NOCASE ASC",
        "nome_desc" => "nome COLLATE NOCASE DESC",
        _ => "id DESC",
    }
}

fn like_clause(q: Option<&str>) -> (String, Option<String>) {
    match q.map(str::trim) {
        Some(q) if !q.is_empty() => (
            "WHERE (nome LIKE ? OR artista LIKE ? OR album LIKE ?)".to_string(),
            Some(format!("%{}%", q)),
        ),
        _ => (String::new(), None),
    }
}

/// Case-insensitive lookup by the dedup triple.
pub async fn find_by_triple(
    db: &Db,
    nome: &str,
    artista: &str,
    album: &str,
) -> Result<Option<Music>> {
    let mut conn = db.open().await?;

    let music = sqlx::query_as::<_, Music>(&format!(
        "{} WHERE LOWER(nome) = LOWER(?) AND LOWER(artista) = LOWER(?) \
         AND LOWER(album) = LOWER(?)",
        SELECT_MUSIC
    ))
    .bind(nome)
    .bind(artista)
    .bind(album)
    .fetch_optional(&mut conn)
    .await?;

    Ok(music)
}

/// Insert a music unless its triple already exists; returns the existing
/// row on a match, never a duplicate.
pub async fn create_music(
    db: &Db,
    nome: &str,
    artista: &str,
    album: &str,
    data_lancamento: &str,
    url_imagem: &str,
) -> Result<Music> {
    if let Some(existing) = find_by_triple(db, nome, artista, album).await? {
        return Ok(existing);
    }

    let mut conn = db.open().await?;

    let result = sqlx::query(
        "INSERT INTO musicas (nome, artista, album, data_lancamento, url_imagem) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(nome)
    .bind(artista)
    .bind(album)
    .bind(data_lancamento)
    .bind(url_imagem)
    .execute(&mut conn)
    .await?;

    let music = sqlx::query_as::<_, Music>(&format!("{} WHERE id = ?", SELECT_MUSIC))
        .bind(result.last_insert_rowid())
        .fetch_one(&mut conn)
        .await?;

    Ok(music)
}

pub async fn get_music(db: &Db, id: i64) -> Result<Option<Music>> {
    let mut conn = db.open().await?;

    let music = sqlx::query_as::<_, Music>(&format!("{} WHERE id = ?", SELECT_MUSIC))
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

    Ok(music)
}

pub async fn update_music(
    db: &Db,
    id: i64,
    nome: &str,
    artista: &str,
    album: &str,
    data_lancamento: &str,
    url_imagem: &str,
) -> Result<bool> {
    let mut conn = db.open().await?;

    let result = sqlx::query(
        "UPDATE musicas SET nome = ?, artista = ?, album = ?, data_lancamento = ?, \
         url_imagem = ? WHERE id = ?",
    )
    .bind(nome)
    .bind(artista)
    .bind(album)
    .bind(data_lancamento)
    .bind(url_imagem)
    .bind(id)
    .execute(&mut conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_music(db: &Db, id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let result = sqlx::query("DELETE FROM musicas WHERE id = ?")
        .bind(id)
        .execute(&mut conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count rows matching a free-text search (for page metadata).
pub async fn count_search(db: &Db, q: Option<&str>) -> Result<i64> {
    let (where_sql, like) = like_clause(q);
    let mut conn = db.open().await?;

    let sql = format!("SELECT COUNT(*) FROM musicas {}", where_sql);
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    if let Some(like) = &like {
        query = query.bind(like).bind(like).bind(like);
    }

    Ok(query.fetch_one(&mut conn).await?)
}

/// Free-text search across nome/artista/album with whitelisted ordering
/// and LIMIT/OFFSET pagination.
pub async fn search_musics(
    db: &Db,
    q: Option<&str>,
    order: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Music>> {
    let (where_sql, like) = like_clause(q);
    let sql = format!(
        "{} {} ORDER BY {} LIMIT ? OFFSET ?",
        SELECT_MUSIC,
        where_sql,
        order_sql(order)
    );

    let mut conn = db.open().await?;

    let mut query = sqlx::query_as::<_, Music>(&sql);
    if let Some(like) = &like {
        query = query.bind(like).bind(like).bind(like);
    }

    let musics = query
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut conn)
        .await?;

    Ok(musics)
}

/// Average rating and review count for one music.
pub async fn rating(db: &Db, musica_id: i64) -> Result<(Option<f64>, i64)> {
    let mut conn = db.open().await?;

    let row: (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(nota), COUNT(*) FROM reviews WHERE musica_id = ?",
    )
    .bind(musica_id)
    .fetch_one(&mut conn)
    .await?;

    Ok(row)
}
