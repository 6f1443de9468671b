//! Refresh-token session model and DTOs.

use learnhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `auth_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session row.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
