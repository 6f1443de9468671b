//! Enrollment entity model and DTOs.

use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full enrollment row from the `enrollments` table.
///
/// The invite token hash never leaves the API; it is skipped during
/// serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub status: String,
    #[serde(skip_serializing)]
    pub invite_token_hash: Option<String>,
    pub invited_by: Option<DbId>,
    pub payment_txn_id: Option<String>,
    pub enrolled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An enrollment joined with course title and inviter name, as shown in
/// "my enrollments" and "my invites" listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrollmentSummary {
    pub id: DbId,
    pub course_id: DbId,
    pub course_title: String,
    pub status: String,
    pub enrolled_at: Option<Timestamp>,
    pub invited_by_name: Option<String>,
}

/// Request body for `POST /courses/{id}/enroll`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollRequest {
    pub invite_token: Option<String>,
    pub payment_txn_id: Option<String>,
}

/// Request body for `POST /courses/{id}/invite`.
#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}
