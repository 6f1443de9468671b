//! Domain error taxonomy shared by every component.
//!
//! The HTTP layer maps these onto status codes (404, 400, 409, 401, 403,
//! 500 respectively); nothing in this crate knows about HTTP.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience result alias for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;
