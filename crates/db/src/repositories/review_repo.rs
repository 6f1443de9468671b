//! Repository for the `reviews` table.

use learnhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, RatingSummary, Review, ReviewWithAuthor};

const COLUMNS: &str = "id, course_id, user_id, rating, review_text, created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. The `uq_reviews_course_user` constraint rejects a
    /// second review from the same user; the violation bubbles up for the
    /// handler to translate.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (course_id, user_id, rating, review_text)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.review_text)
            .fetch_one(pool)
            .await
    }

    /// List a course's reviews with author names, newest first.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.course_id, r.user_id, r.rating, r.review_text, r.created_at,
                    u.name AS user_name
             FROM reviews r
             JOIN users u ON r.user_id = u.id
             WHERE r.course_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Average rating and review count for a course.
    pub async fn rating_summary(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT COALESCE(AVG(rating), 0)::FLOAT8 AS average_rating,
                    COUNT(*) AS review_count
             FROM reviews
             WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a review. Admins may delete any review; other callers only
    /// their own. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        review_id: DbId,
        user_id: DbId,
        is_admin: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = if is_admin {
            sqlx::query("DELETE FROM reviews WHERE id = $1")
                .bind(review_id)
                .execute(pool)
                .await?
        } else {
            sqlx::query("DELETE FROM reviews WHERE id = $1 AND user_id = $2")
                .bind(review_id)
                .bind(user_id)
                .execute(pool)
                .await?
        };
        Ok(result.rows_affected() > 0)
    }
}
