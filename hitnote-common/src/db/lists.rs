//! List (playlist) store
//!
//! Mutations condition the WHERE clause on both the list id and the owner
//! id in one statement, so a single boolean covers "missing" and "not
//! yours". Callers that need to answer 404 vs 403 disambiguate with a
//! follow-up [`get_list`]. Membership operations perform no ownership
//! check at all; the authorization layer must verify ownership first.

use crate::db::models::{List, ListItem, ListSummary};
use crate::db::Db;
use crate::Result;

/// Create a list and return its id.
pub async fn create_list(
    db: &Db,
    usuario_id: i64,
    nome: &str,
    descricao: &str,
    publica: bool,
) -> Result<i64> {
    let mut conn = db.open().await?;

    let result = sqlx::query(
        "INSERT INTO listas (usuario_id, nome, descricao, publica) VALUES (?, ?, ?, ?)",
    )
    .bind(usuario_id)
    .bind(nome)
    .bind(descricao)
    .bind(publica)
    .execute(&mut conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Ownership-conditioned update. Returns false both when the list does not
/// exist and when `usuario_id` is not the owner; stored fields are
/// untouched in either case.
pub async fn edit_list(
    db: &Db,
    lista_id: i64,
    usuario_id: i64,
    nome: &str,
    descricao: &str,
    publica: bool,
) -> Result<bool> {
    let mut conn = db.open().await?;

    let result = sqlx::query(
        "UPDATE listas SET nome = ?, descricao = ?, publica = ? \
         WHERE id = ? AND usuario_id = ?",
    )
    .bind(nome)
    .bind(descricao)
    .bind(publica)
    .bind(lista_id)
    .bind(usuario_id)
    .execute(&mut conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Ownership-conditioned delete; membership rows go via cascade.
pub async fn delete_list(db: &Db, lista_id: i64, usuario_id: i64) -> Result<bool> {
    let mut conn = db.open().await?;

    let result = sqlx::query("DELETE FROM listas WHERE id = ? AND usuario_id = ?")
        .bind(lista_id)
        .bind(usuario_id)
        .execute(&mut conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Lists belonging to a user, newest first (id is the recency proxy; there
/// is no timestamp ordering). With `only_public`, private lists never
/// appear in the result set.
pub async fn lists_for_user(
    db: &Db,
    usuario_id: i64,
    only_public: bool,
) -> Result<Vec<ListSummary>> {
    let mut sql = String::from(
        "SELECT l.id, l.nome, l.descricao, l.url_capa, l.publica, l.data_criacao, \
         l.usuario_id, \
         (SELECT COUNT(*) FROM lista_musicas lm WHERE lm.lista_id = l.id) AS song_count \
         FROM listas l WHERE l.usuario_id = ?",
    );
    if only_public {
        sql.push_str(" AND l.publica = 1");
    }
    sql.push_str(" ORDER BY l.id DESC");

    let mut conn = db.open().await?;

    let lists = sqlx::query_as::<_, ListSummary>(&sql)
        .bind(usuario_id)
        .fetch_all(&mut conn)
        .await?;

    Ok(lists)
}

pub async fn get_list(db: &Db, lista_id: i64) -> Result<Option<List>> {
    let mut conn = db.open().await?;

    let list = sqlx::query_as::<_, List>(
        "SELECT id, nome, descricao, url_capa, publica, data_criacao, usuario_id \
         FROM listas WHERE id = ?",
    )
    .bind(lista_id)
    .fetch_optional(&mut conn)
    .await?;

    Ok(list)
}

/// Idempotent membership insert. No ownership check here.
pub async fn add_music(db: &Db, lista_id: i64, musica_id: i64) -> Result<()> {
    let mut conn = db.open().await?;

    sqlx::query("INSERT OR IGNORE INTO lista_musicas (lista_id, musica_id) VALUES (?, ?)")
        .bind(lista_id)
        .bind(musica_id)
        .execute(&mut conn)
        .await?;

    Ok(())
}

/// Membership delete by composite key. No ownership check here.
pub async fn remove_music(db: &Db, lista_id: i64, musica_id: i64) -> Result<()> {
    let mut conn = db.open().await?;

    sqlx::query("DELETE FROM lista_musicas WHERE lista_id = ? AND musica_id = ?")
        .bind(lista_id)
        .bind(musica_id)
        .execute(&mut conn)
        .await?;

    Ok(())
}

/// Musics inside a list, most recently added first.
pub async fn musics_in_list(db: &Db, lista_id: i64) -> Result<Vec<ListItem>> {
    let mut conn = db.open().await?;

    let items = sqlx::query_as::<_, ListItem>(
        "SELECT m.id, m.nome, m.artista, m.album, m.url_imagem, lm.adicionado_em \
         FROM musicas m JOIN lista_musicas lm ON m.id = lm.musica_id \
         WHERE lm.lista_id = ? ORDER BY lm.adicionado_em DESC",
    )
    .bind(lista_id)
    .fetch_all(&mut conn)
    .await?;

    Ok(items)
}

/// Membership count for one list.
pub async fn song_count(db: &Db, lista_id: i64) -> Result<i64> {
    let mut conn = db.open().await?;

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM lista_musicas WHERE lista_id = ?")
            .bind(lista_id)
            .fetch_one(&mut conn)
            .await?;

    Ok(count)
}
