//! Lesson entity model and DTOs.

use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Valid lesson content types, matching the CHECK constraint on
/// `lessons.lesson_type`.
pub const LESSON_TYPES: [&str; 5] = ["VIDEO", "DOCUMENT", "IMAGE", "LINK", "QUIZ"];

/// Full lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub lesson_type: String,
    pub content_url: Option<String>,
    pub duration_seconds: i32,
    pub allow_download: bool,
    pub description: Option<String>,
    pub order_index: i32,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact lesson representation for course content listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonSummary {
    pub id: DbId,
    pub title: String,
    pub lesson_type: String,
    pub duration_seconds: i32,
    pub allow_download: bool,
    pub order_index: i32,
}

/// DTO shared by lesson create and update (the editor submits full rows).
#[derive(Debug, Deserialize)]
pub struct LessonInput {
    pub title: String,
    pub lesson_type: String,
    pub content_url: Option<String>,
    pub duration_seconds: Option<i32>,
    #[serde(default)]
    pub allow_download: bool,
    pub description: Option<String>,
    pub order_index: Option<i32>,
}
