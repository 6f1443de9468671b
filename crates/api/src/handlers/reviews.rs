//! Handlers for course reviews.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnhub_core::error::CoreError;
use learnhub_core::types::DbId;
use learnhub_db::models::review::{CreateReview, RatingSummary, Review, ReviewWithAuthor};
use learnhub_db::repositories::ReviewRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::courses::load_course;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `GET /courses/{id}/reviews`: the reviews plus their
/// aggregate.
#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewWithAuthor>,
    pub stats: RatingSummary,
}

/// POST /api/v1/courses/{id}/reviews
///
/// Add a review. One review per (course, user); a second attempt surfaces
/// the unique violation as 409.
pub async fn add_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::Core(CoreError::Validation(
            "Rating must be between 1 and 5".into(),
        )));
    }

    load_course(&state, course_id).await?;

    let review = ReviewRepo::create(&state.pool, course_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/courses/{id}/reviews
///
/// Public listing of a course's reviews with the average rating.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReviewListResponse>>> {
    load_course(&state, course_id).await?;

    let reviews = ReviewRepo::list_for_course(&state.pool, course_id).await?;
    let stats = ReviewRepo::rating_summary(&state.pool, course_id).await?;

    Ok(Json(DataResponse {
        data: ReviewListResponse { reviews, stats },
    }))
}

/// DELETE /api/v1/reviews/{id}
///
/// Delete a review: the author may delete their own, admins any.
pub async fn delete_review(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let perms = user.permissions();
    let deleted = ReviewRepo::delete(&state.pool, id, user.user_id, perms.is_admin()).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to delete this review".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
