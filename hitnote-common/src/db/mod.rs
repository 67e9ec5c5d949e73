//! Database access layer
//!
//! Every logical operation opens its own short-lived connection through
//! [`Db::open`] and releases it on drop. There is no application-wide pool
//! and no transaction spanning multiple stores; multi-step operations are
//! sequential round trips with no isolation guarantee against concurrent
//! writers. That model is load-bearing: callers must not reintroduce a
//! shared connection singleton.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::path::Path;

pub mod init;
pub mod lists;
pub mod models;
pub mod music;
pub mod reviews;
pub mod users;

/// Per-call connection provider for the single-file SQLite store.
///
/// Cheap to clone; holds only the connect options.
#[derive(Debug, Clone)]
pub struct Db {
    options: SqliteConnectOptions,
}

impl Db {
    /// Create a provider for the database at `path`, creating the file on
    /// first open. Foreign keys are enforced on every connection.
    pub fn new(path: &Path) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        Self { options }
    }

    /// Open a fresh, independent connection for one logical operation.
    pub async fn open(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }
}
