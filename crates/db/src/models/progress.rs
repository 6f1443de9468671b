//! Lesson progress and learner stats models.

use learnhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lesson_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub course_id: DbId,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub time_spent_seconds: i64,
}

/// Request body for `POST /lessons/{id}/progress`.
#[derive(Debug, Deserialize)]
pub struct TrackProgressRequest {
    pub course_id: Option<DbId>,
    #[serde(default)]
    pub completed: bool,
    /// Seconds spent since the last report; accumulated, never replaced.
    pub time_spent: Option<i64>,
}

/// Completed/total lesson counts for one (user, course) pair.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CourseProgressCounts {
    pub completed_lessons: i64,
    pub total_lessons: i64,
}

/// Aggregate learner statistics across all courses.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LearnerStatsRow {
    pub courses_enrolled: i64,
    pub lessons_completed: i64,
    pub total_points: i64,
}
