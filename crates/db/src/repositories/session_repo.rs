//! Repository for the `auth_sessions` table (refresh-token sessions).

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{AuthSession, CreateSession};

const COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    /// Persist a new session row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<AuthSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO auth_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live (unrevoked, unexpired) session by refresh-token hash.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<AuthSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auth_sessions
             WHERE refresh_token_hash = $1
               AND revoked_at IS NULL
               AND expires_at > now()"
        );
        sqlx::query_as::<_, AuthSession>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session (token rotation).
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE auth_sessions SET revoked_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Revoke every live session for a user (logout).
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE auth_sessions SET revoked_at = now()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
