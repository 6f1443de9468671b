//! Read-only reporting projections for instructors.

use learnhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Learner counts by coarse completion status for one course.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct CompletionStats {
    pub yet_to_start: i64,
    pub in_progress: i64,
    pub completed: i64,
}

/// Per-learner progress detail for one course.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearnerReportRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub completed_lessons: i64,
    pub total_lessons: i64,
    pub high_score: i32,
}

/// One enrollment's progress across an instructor's whole catalogue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstructorProgressRow {
    pub course_name: String,
    pub participant_name: String,
    pub enrolled_date: Option<Timestamp>,
    pub start_date: Option<Timestamp>,
    pub time_spent_seconds: i64,
    pub total_lessons: i64,
    pub completed_count: i64,
    pub completion_percentage: i32,
    pub completed_date: Option<Timestamp>,
    pub status: String,
}
