//! Review store
//!
//! Reviews carry a foreign key to `musicas`, so joins resolve by id and a
//! title rename cannot orphan existing reviews. Creation is two sequential
//! round trips (insert, then fetch by last-insert rowid) with no isolation
//! span between them.

use crate::db::models::Review;
use crate::db::Db;
use crate::Result;

const SELECT_REVIEW: &str =
    "SELECT r.id, m.nome AS musica, r.nota, r.comentario, u.nome AS autor, \
     r.usuario_id AS autor_id \
     FROM reviews r \
     JOIN musicas m ON r.musica_id = m.id \
     JOIN usuarios u ON r.usuario_id = u.id";

/// Insert a review and return it joined with music and author names.
pub async fn create_review(
    db: &Db,
    musica_id: i64,
    nota: f64,
    comentario: &str,
    usuario_id: i64,
) -> Result<Review> {
    let mut conn = db.open().await?;

    let result = sqlx::query(
        "INSERT INTO reviews (musica_id, nota, comentario, usuario_id) VALUES (?, ?, ?, ?)",
    )
    .bind(musica_id)
    .bind(nota)
    .bind(comentario)
    .bind(usuario_id)
    .execute(&mut conn)
    .await?;

    let review = sqlx::query_as::<_, Review>(&format!("{} WHERE r.id = ?", SELECT_REVIEW))
        .bind(result.last_insert_rowid())
        .fetch_one(&mut conn)
        .await?;

    Ok(review)
}

/// All reviews for a music, most recent first.
pub async fn reviews_for_music(db: &Db, musica_id: i64) -> Result<Vec<Review>> {
    let mut conn = db.open().await?;

    let reviews = sqlx::query_as::<_, Review>(&format!(
        "{} WHERE r.musica_id = ? ORDER BY r.id DESC",
        SELECT_REVIEW
    ))
    .bind(musica_id)
    .fetch_all(&mut conn)
    .await?;

    Ok(reviews)
}

/// Ownership-conditioned delete; false when the review is missing or the
/// caller is not its author.
pub async fn delete_review(db: &Db, review_id: i64, usuario_id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let result = sqlx::query("DELETE FROM reviews WHERE id = ? AND usuario_id = ?")
        .bind(review_id)
        .bind(usuario_id)
        .execute(&mut conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
