//! Repository for the `lessons` table.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::{Lesson, LessonInput, LessonSummary};

const COLUMNS: &str = "id, course_id, title, lesson_type, content_url, duration_seconds, \
                       allow_download, description, order_index, created_by, \
                       created_at, updated_at";

pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson into a course.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        input: &LessonInput,
        created_by: DbId,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (course_id, title, lesson_type, content_url,
                                  duration_seconds, allow_download, description,
                                  order_index, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(course_id)
            .bind(&input.title)
            .bind(&input.lesson_type)
            .bind(&input.content_url)
            .bind(input.duration_seconds.unwrap_or(0))
            .bind(input.allow_download)
            .bind(&input.description)
            .bind(input.order_index.unwrap_or(0))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a lesson by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's lessons in display order.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<LessonSummary>, sqlx::Error> {
        sqlx::query_as::<_, LessonSummary>(
            "SELECT id, title, lesson_type, duration_seconds, allow_download, order_index
             FROM lessons
             WHERE course_id = $1
             ORDER BY order_index ASC",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the mutable fields of a lesson.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &LessonInput,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons
             SET title = $2, lesson_type = $3, content_url = $4, duration_seconds = $5,
                 allow_download = $6, description = $7, order_index = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.lesson_type)
            .bind(&input.content_url)
            .bind(input.duration_seconds.unwrap_or(0))
            .bind(input.allow_download)
            .bind(&input.description)
            .bind(input.order_index.unwrap_or(0))
            .fetch_optional(pool)
            .await
    }

    /// Delete a lesson. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
