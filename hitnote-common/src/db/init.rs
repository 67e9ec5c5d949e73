//! Schema bootstrap
//!
//! Creates the seven HitNote tables on startup. All statements are
//! `CREATE TABLE IF NOT EXISTS`, so bootstrap is idempotent and safe to run
//! on every launch. Other collaborators query these tables directly, so the
//! column names and key composites are part of the external contract.

use crate::db::Db;
use crate::Result;
use sqlx::SqliteConnection;
use tracing::info;

/// Create all tables if needed.
pub async fn create_all_tables(db: &Db) -> Result<()> {
    let mut conn = db.open().await?;

    create_usuarios_table(&mut conn).await?;
    create_musicas_table(&mut conn).await?;
    create_reviews_table(&mut conn).await?;
    create_listas_tables(&mut conn).await?;
    create_seguidores_table(&mut conn).await?;
    create_curtidas_table(&mut conn).await?;

    info!("Database tables ready");
    Ok(())
}

/// Drop every table (seed tool only). Order respects foreign keys.
pub async fn drop_all_tables(db: &Db) -> Result<()> {
    let mut conn = db.open().await?;

    for table in [
        "curtidas",
        "seguidores",
        "lista_musicas",
        "listas",
        "reviews",
        "musicas",
        "usuarios",
    ] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&mut conn)
            .await?;
    }

    info!("Database tables dropped");
    Ok(())
}

async fn create_usuarios_table(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS usuarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            senha TEXT NOT NULL,
            biografia TEXT,
            url_foto TEXT,
            url_capa TEXT,
            localizacao TEXT,
            data_cadastro TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn create_musicas_table(conn: &mut SqliteConnection) -> Result<()> {
    // Dedup identity is the case-insensitive (nome, artista, album) triple,
    // enforced by read-then-maybe-write in the store, not by a constraint.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS musicas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            artista TEXT NOT NULL,
            album TEXT NOT NULL,
            data_lancamento TEXT,
            url_imagem TEXT
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn create_reviews_table(conn: &mut SqliteConnection) -> Result<()> {
    // Reviews reference musics by id so a title rename cannot orphan them.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            musica_id INTEGER NOT NULL REFERENCES musicas(id) ON DELETE CASCADE,
            nota REAL NOT NULL CHECK (nota >= 0 AND nota <= 5),
            comentario TEXT,
            usuario_id INTEGER NOT NULL REFERENCES usuarios(id)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn create_listas_tables(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS listas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            descricao TEXT,
            url_capa TEXT,
            publica BOOLEAN NOT NULL DEFAULT 1,
            data_criacao TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            usuario_id INTEGER NOT NULL REFERENCES usuarios(id)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    // Membership: at most one row per (lista, musica), cascading both ways.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lista_musicas (
            lista_id INTEGER NOT NULL REFERENCES listas(id) ON DELETE CASCADE,
            musica_id INTEGER NOT NULL REFERENCES musicas(id) ON DELETE CASCADE,
            adicionado_em TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (lista_id, musica_id)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn create_seguidores_table(conn: &mut SqliteConnection) -> Result<()> {
    // Row existence is the whole state of a follow edge; no timestamp.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seguidores (
            seguidor_id INTEGER NOT NULL REFERENCES usuarios(id),
            seguido_id INTEGER NOT NULL REFERENCES usuarios(id),
            PRIMARY KEY (seguidor_id, seguido_id)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn create_curtidas_table(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS curtidas (
            usuario_id INTEGER NOT NULL REFERENCES usuarios(id),
            musica_id INTEGER NOT NULL REFERENCES musicas(id) ON DELETE CASCADE,
            PRIMARY KEY (usuario_id, musica_id)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}
