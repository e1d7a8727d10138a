//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// A write targeted a row that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule would be broken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type DbResult<T> = Result<T, DbError>;
