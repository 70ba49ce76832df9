//! Repository-level error types.
//!
//! Every failure here is a per-request outcome; nothing is fatal to the
//! process. Not-found deliberately carries no detail: an absent entity and a
//! hidden one must be indistinguishable to callers.

use thiserror::Error;

/// Errors surfaced by the entity store.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}
