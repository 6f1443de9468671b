//! Repository for the `courses` table.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{
    Course, CourseContentStats, CourseWithRating, CreateCourse, UpdateCourse,
};

const COLUMNS: &str = "id, title, short_description, long_description, tags, visibility, \
                       access_rule, price_cents, is_published, total_views, created_by, \
                       created_at, updated_at";

/// Columns for listing queries: the course row joined with its review
/// aggregate. `r` is the rating sub-select, `c` the courses table.
const RATED_COLUMNS: &str = "c.id, c.title, c.short_description, c.long_description, c.tags, \
                             c.visibility, c.access_rule, c.price_cents, c.is_published, \
                             c.total_views, c.created_by, c.created_at, \
                             COALESCE(r.average_rating, 0)::FLOAT8 AS average_rating, \
                             COALESCE(r.review_count, 0) AS review_count";

const RATING_JOIN: &str = "LEFT JOIN (
        SELECT course_id, AVG(rating)::FLOAT8 AS average_rating, COUNT(*) AS review_count
        FROM reviews
        GROUP BY course_id
    ) r ON r.course_id = c.id";

/// Catalogue visibility filter. `$1` is the viewer's user id (NULL when
/// anonymous): unpublished courses are only shown to their owner, and
/// anonymous callers only see EVERYONE-visible courses.
const LIST_FILTER: &str = "(c.is_published = TRUE OR c.created_by = $1)
      AND ($1::BIGINT IS NOT NULL OR c.visibility = 'EVERYONE')
      AND ($2::TEXT IS NULL OR c.title ILIKE '%' || $2 || '%')
      AND ($3::TEXT[] IS NULL OR c.tags && $3)";

pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course. Courses are always created unpublished.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourse,
        created_by: DbId,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (title, short_description, long_description, tags,
                                  visibility, access_rule, price_cents, created_by, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.short_description)
            .bind(&input.long_description)
            .bind(&input.tags)
            .bind(&input.visibility)
            .bind(&input.access_rule)
            .bind(input.price_cents.unwrap_or(0))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a course by id, without side effects.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List catalogue courses visible to `viewer`, newest first.
    pub async fn list(
        pool: &PgPool,
        viewer: Option<DbId>,
        title_query: Option<&str>,
        tags: Option<&[String]>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CourseWithRating>, sqlx::Error> {
        let query = format!(
            "SELECT {RATED_COLUMNS}
             FROM courses c
             {RATING_JOIN}
             WHERE {LIST_FILTER}
             ORDER BY c.created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, CourseWithRating>(&query)
            .bind(viewer)
            .bind(title_query)
            .bind(tags)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count catalogue courses matching the same filter as [`Self::list`].
    pub async fn count(
        pool: &PgPool,
        viewer: Option<DbId>,
        title_query: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM courses c WHERE {LIST_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(viewer)
            .bind(title_query)
            .bind(tags)
            .fetch_one(pool)
            .await
    }

    /// Fetch a course detail view and bump its view counter.
    ///
    /// The counter increment, the rated read, and the content stats run in
    /// one transaction so a failure leaves the counter untouched.
    pub async fn find_with_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(CourseWithRating, CourseContentStats)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query("UPDATE courses SET total_views = total_views + 1 WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "SELECT {RATED_COLUMNS}
             FROM courses c
             {RATING_JOIN}
             WHERE c.id = $1"
        );
        let course = sqlx::query_as::<_, CourseWithRating>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let stats = sqlx::query_as::<_, CourseContentStats>(
            "SELECT COUNT(id) AS lessons,
                    COALESCE(SUM(duration_seconds), 0)::BIGINT AS duration_seconds
             FROM lessons
             WHERE course_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some((course, stats)))
    }

    /// Replace the mutable fields of a course.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses
             SET title = $2, short_description = $3, tags = $4,
                 visibility = $5, access_rule = $6, price_cents = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.short_description)
            .bind(&input.tags)
            .bind(&input.visibility)
            .bind(&input.access_rule)
            .bind(input.price_cents.unwrap_or(0))
            .fetch_optional(pool)
            .await
    }

    /// Flip the publish flag, returning the updated row.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        is_published: bool,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET is_published = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(is_published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course; children cascade at the schema level.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
