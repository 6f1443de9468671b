//! Course entity model and DTOs.

use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub tags: Vec<String>,
    pub visibility: String,
    pub access_rule: String,
    pub price_cents: i64,
    pub is_published: bool,
    pub total_views: i64,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course row joined with its review aggregate, as returned by listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseWithRating {
    pub id: DbId,
    pub title: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub tags: Vec<String>,
    pub visibility: String,
    pub access_rule: String,
    pub price_cents: i64,
    pub is_published: bool,
    pub total_views: i64,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub average_rating: f64,
    pub review_count: i64,
}

/// Lesson count and total duration for a course detail view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseContentStats {
    pub lessons: i64,
    pub duration_seconds: i64,
}

/// DTO for creating a course. Validation (enum values, PAID price) happens
/// in the handler via `learnhub_core::access` before this reaches SQL.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: String,
    pub access_rule: String,
    pub price_cents: Option<i64>,
}

/// DTO for updating a course. All fields required, mirroring the full-row
/// update the edit form submits.
#[derive(Debug, Deserialize)]
pub struct UpdateCourse {
    pub title: String,
    pub short_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub visibility: String,
    pub access_rule: String,
    pub price_cents: Option<i64>,
}

/// Listing filters from the course catalogue query string.
#[derive(Debug, Default, Deserialize)]
pub struct CourseFilters {
    /// Title substring match (case-insensitive).
    pub q: Option<String>,
    /// Comma-separated tag list; a course matches when it overlaps any tag.
    pub tags: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination metadata returned alongside course listings.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}
