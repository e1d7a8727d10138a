//! Routing errors.

use thiserror::Error;

/// Result type for routing setup.
pub type RouterResult<T> = Result<T, RouterError>;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("redirect cycle: {}", .0.join(" -> "))]
    RedirectCycle(Vec<String>),

    #[error("redirect target {0:?} is not a valid Location header")]
    InvalidLocation(String),
}
