//! Review entity model and DTOs.

use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub review_text: Option<String>,
    pub created_at: Timestamp,
}

/// A review joined with the author's name for course review listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub review_text: Option<String>,
    pub created_at: Timestamp,
    pub user_name: String,
}

/// Average rating and count for a course.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: i64,
}

/// Request body for `POST /courses/{id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub rating: i32,
    pub review_text: Option<String>,
}
