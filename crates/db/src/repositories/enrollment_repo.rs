//! Repository for the `enrollments` table.
//!
//! Writes are `ON CONFLICT` upserts against `uq_enrollments_user_course`,
//! so concurrent duplicate requests for the same (user, course) pair
//! converge on a single row without explicit locking. Token redemption is
//! a single guarded UPDATE: the match against the stored hash and the
//! activation happen atomically.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{Enrollment, EnrollmentSummary};

const COLUMNS: &str = "id, user_id, course_id, status, invite_token_hash, invited_by, \
                       payment_txn_id, enrolled_at, created_at, updated_at";

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Find the enrollment for one (user, course) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert an enrollment straight to ACTIVE, stamping `enrolled_at`.
    ///
    /// Used for OPEN courses and for self-claiming a pending invite.
    pub async fn upsert_active(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, status, enrolled_at)
             VALUES ($1, $2, 'ACTIVE', now())
             ON CONFLICT (user_id, course_id) DO UPDATE
             SET status = 'ACTIVE', enrolled_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// Upsert an enrollment to ACTIVE with a payment reference attached.
    pub async fn upsert_active_paid(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        payment_txn_id: &str,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, status, payment_txn_id, enrolled_at)
             VALUES ($1, $2, 'ACTIVE', $3, now())
             ON CONFLICT (user_id, course_id) DO UPDATE
             SET status = 'ACTIVE', payment_txn_id = EXCLUDED.payment_txn_id,
                 enrolled_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(payment_txn_id)
            .fetch_one(pool)
            .await
    }

    /// Activate an INVITED enrollment if `token_hash` matches its stored
    /// token hash. Returns `None` when nothing matched (wrong token, no
    /// pending invite, or wrong course) -- the caller cannot tell which,
    /// by design.
    pub async fn redeem_invite_token(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        token_hash: &str,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments
             SET status = 'ACTIVE', enrolled_at = now()
             WHERE user_id = $1 AND course_id = $2
               AND invite_token_hash = $3 AND status = 'INVITED'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Upsert an INVITED enrollment, rotating any previously stored token
    /// hash. Re-inviting an already-invited user is not an error.
    pub async fn upsert_invite(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        token_hash: &str,
        invited_by: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, status, invite_token_hash, invited_by)
             VALUES ($1, $2, 'INVITED', $3, $4)
             ON CONFLICT (user_id, course_id) DO UPDATE
             SET status = 'INVITED',
                 invite_token_hash = EXCLUDED.invite_token_hash,
                 invited_by = EXCLUDED.invited_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(token_hash)
            .bind(invited_by)
            .fetch_one(pool)
            .await
    }

    /// List all of a user's enrollments with course titles, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EnrollmentSummary>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentSummary>(
            "SELECT e.id, e.course_id, c.title AS course_title, e.status, e.enrolled_at,
                    u.name AS invited_by_name
             FROM enrollments e
             JOIN courses c ON e.course_id = c.id
             LEFT JOIN users u ON e.invited_by = u.id
             WHERE e.user_id = $1
             ORDER BY e.enrolled_at DESC NULLS FIRST",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// List a user's pending invites, newest first.
    pub async fn list_pending_invites(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EnrollmentSummary>, sqlx::Error> {
        sqlx::query_as::<_, EnrollmentSummary>(
            "SELECT e.id, e.course_id, c.title AS course_title, e.status, e.enrolled_at,
                    u.name AS invited_by_name
             FROM enrollments e
             JOIN courses c ON e.course_id = c.id
             JOIN users u ON e.invited_by = u.id
             WHERE e.user_id = $1 AND e.status = 'INVITED'
             ORDER BY e.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
