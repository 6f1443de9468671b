//! Repository for the `lesson_progress` table and learner stat aggregates.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::{CourseProgressCounts, LearnerStatsRow, LessonProgress};

const COLUMNS: &str =
    "id, user_id, lesson_id, course_id, completed, completed_at, time_spent_seconds";

pub struct ProgressRepo;

impl ProgressRepo {
    /// Upsert one lesson-progress row.
    ///
    /// `completed_at` is set on the first transition to completed and never
    /// overwritten afterwards, including by a later `completed = false`
    /// report. Time spent accumulates; it is never replaced.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
        course_id: DbId,
        completed: bool,
        time_spent_delta: i64,
    ) -> Result<LessonProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (user_id, lesson_id, course_id, completed,
                                          completed_at, time_spent_seconds)
             VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN now() END, $5)
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                 completed = EXCLUDED.completed,
                 completed_at = CASE
                     WHEN EXCLUDED.completed AND lesson_progress.completed_at IS NULL
                         THEN now()
                     ELSE lesson_progress.completed_at
                 END,
                 time_spent_seconds = lesson_progress.time_spent_seconds
                                      + EXCLUDED.time_spent_seconds
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(course_id)
            .bind(completed)
            .bind(time_spent_delta)
            .fetch_one(pool)
            .await
    }

    /// Completed/total lesson counts for one (user, course) pair.
    pub async fn course_counts(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<CourseProgressCounts, sqlx::Error> {
        sqlx::query_as::<_, CourseProgressCounts>(
            "SELECT
                 (SELECT COUNT(*) FROM lesson_progress
                  WHERE user_id = $1 AND course_id = $2 AND completed = TRUE)
                     AS completed_lessons,
                 (SELECT COUNT(*) FROM lessons WHERE course_id = $2) AS total_lessons",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// Lifetime aggregates for one learner. Failed attempts contribute
    /// their zero `points_earned` to the sum, not nothing.
    pub async fn learner_stats(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<LearnerStatsRow, sqlx::Error> {
        sqlx::query_as::<_, LearnerStatsRow>(
            "SELECT
                 (SELECT COUNT(DISTINCT course_id) FROM enrollments
                  WHERE user_id = $1) AS courses_enrolled,
                 (SELECT COUNT(*) FROM lesson_progress
                  WHERE user_id = $1 AND completed = TRUE) AS lessons_completed,
                 (SELECT COALESCE(SUM(points_earned), 0) FROM quiz_attempts
                  WHERE user_id = $1)::BIGINT AS total_points",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
