//! Read-only reporting projections for instructors.
//!
//! Nothing here makes decisions; these are aggregation queries over the
//! enrollment / progress / attempt data the core components maintain.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::reporting::{CompletionStats, InstructorProgressRow, LearnerReportRow};

pub struct ReportingRepo;

impl ReportingRepo {
    /// Learner counts by coarse completion status for one course.
    pub async fn course_completion_stats(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<CompletionStats, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "WITH learner_progress AS (
                 SELECT
                     e.user_id,
                     COUNT(lp.lesson_id) FILTER (WHERE lp.completed = TRUE) AS completed_count,
                     (SELECT COUNT(*) FROM lessons WHERE course_id = $1) AS total_lessons
                 FROM enrollments e
                 LEFT JOIN lesson_progress lp
                     ON e.user_id = lp.user_id AND e.course_id = lp.course_id
                 WHERE e.course_id = $1
                 GROUP BY e.user_id
             ),
             learner_status AS (
                 SELECT
                     user_id,
                     CASE
                         WHEN completed_count = 0 THEN 'YET_TO_START'
                         WHEN completed_count < total_lessons THEN 'IN_PROGRESS'
                         WHEN completed_count = total_lessons AND total_lessons > 0
                             THEN 'COMPLETED'
                         ELSE 'YET_TO_START'
                     END AS status
                 FROM learner_progress
             )
             SELECT status, COUNT(*) FROM learner_status GROUP BY status",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        let mut stats = CompletionStats::default();
        for (status, count) in rows {
            match status.as_str() {
                "YET_TO_START" => stats.yet_to_start = count,
                "IN_PROGRESS" => stats.in_progress = count,
                "COMPLETED" => stats.completed = count,
                _ => {}
            }
        }
        Ok(stats)
    }

    /// Per-learner progress detail for one course, including the learner's
    /// highest quiz score across the course's quizzes.
    pub async fn learner_details(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<LearnerReportRow>, sqlx::Error> {
        sqlx::query_as::<_, LearnerReportRow>(
            "SELECT
                 u.id, u.name, u.email,
                 COUNT(DISTINCT lp.lesson_id) FILTER (WHERE lp.completed = TRUE)
                     AS completed_lessons,
                 (SELECT COUNT(*) FROM lessons WHERE course_id = $1) AS total_lessons,
                 COALESCE(MAX(qa.score), 0) AS high_score
             FROM enrollments e
             JOIN users u ON e.user_id = u.id
             LEFT JOIN lesson_progress lp
                 ON e.user_id = lp.user_id AND e.course_id = lp.course_id
             LEFT JOIN quizzes q ON q.course_id = $1
             LEFT JOIN quiz_attempts qa ON qa.user_id = u.id AND qa.quiz_id = q.id
             WHERE e.course_id = $1
             GROUP BY u.id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Progress of every enrollment across all courses owned by one
    /// instructor.
    pub async fn instructor_overview(
        pool: &PgPool,
        instructor_id: DbId,
    ) -> Result<Vec<InstructorProgressRow>, sqlx::Error> {
        sqlx::query_as::<_, InstructorProgressRow>(
            "WITH course_stats AS (
                 SELECT
                     c.id AS course_id,
                     c.title AS course_name,
                     COUNT(l.id) AS total_lessons
                 FROM courses c
                 LEFT JOIN lessons l ON c.id = l.course_id
                 WHERE c.created_by = $1
                 GROUP BY c.id, c.title
             ),
             learner_progress AS (
                 SELECT
                     cs.course_name,
                     u.name AS participant_name,
                     e.enrolled_at AS enrolled_date,
                     MIN(lp.completed_at) AS start_date,
                     SUM(COALESCE(lp.time_spent_seconds, 0))::BIGINT AS time_spent_seconds,
                     cs.total_lessons,
                     COUNT(lp.lesson_id) FILTER (WHERE lp.completed = TRUE)
                         AS completed_count,
                     MAX(lp.completed_at) AS completed_date
                 FROM enrollments e
                 JOIN users u ON e.user_id = u.id
                 JOIN course_stats cs ON e.course_id = cs.course_id
                 LEFT JOIN lesson_progress lp
                     ON e.user_id = lp.user_id AND e.course_id = lp.course_id
                 GROUP BY cs.course_name, u.name, e.enrolled_at, cs.total_lessons
             )
             SELECT
                 course_name,
                 participant_name,
                 enrolled_date,
                 start_date,
                 time_spent_seconds,
                 total_lessons,
                 completed_count,
                 CASE
                     WHEN total_lessons = 0 THEN 0
                     ELSE ROUND(completed_count::NUMERIC / total_lessons * 100)
                 END::INTEGER AS completion_percentage,
                 completed_date,
                 CASE
                     WHEN completed_count = 0 THEN 'NOT_STARTED'
                     WHEN completed_count < total_lessons THEN 'IN_PROGRESS'
                     WHEN completed_count = total_lessons AND total_lessons > 0
                         THEN 'COMPLETED'
                     ELSE 'NOT_STARTED'
                 END AS status
             FROM learner_progress",
        )
        .bind(instructor_id)
        .fetch_all(pool)
        .await
    }
}
