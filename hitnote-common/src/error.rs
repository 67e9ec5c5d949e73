//! Common error types for HitNote

use thiserror::Error;

/// Common result type for HitNote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the stores and the HTTP boundary.
///
/// Storage-level integrity violations are caught at the store boundary and
/// re-raised as the matching variant; raw sqlx errors never cross the API
/// surface. The HTTP layer owns the status-code mapping (404 NotFound,
/// 403 Forbidden, 401 Unauthorized, 400 InvalidInput/Conflict).
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller is not the owner of the target entity
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing/invalid/expired token or bad credentials.
    /// The message is deliberately generic: token failures are
    /// indistinguishable to the caller.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Remap a unique-constraint violation to `Conflict`, leaving every
    /// other storage failure as `Database`.
    ///
    /// Registration pre-checks email existence, but the window between
    /// check and insert is not atomic; the constraint is the backstop.
    pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> Error {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::Conflict(message.to_string())
            }
            _ => Error::Database(err),
        }
    }
}
