//! Handlers for lesson progress tracking and learner statistics.

use axum::extract::{Path, State};
use axum::Json;
use learnhub_core::error::CoreError;
use learnhub_core::progress::{badge_for_points, completion_percentage};
use learnhub_core::types::DbId;
use learnhub_db::models::progress::{LessonProgress, TrackProgressRequest};
use learnhub_db::repositories::ProgressRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::lessons::load_lesson;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `GET /courses/{id}/my-progress`.
#[derive(Debug, Serialize)]
pub struct CourseProgressResponse {
    pub completion_percentage: i32,
    pub completed_lessons: i64,
    pub total_lessons: i64,
}

/// Response for `GET /users/me/stats`.
#[derive(Debug, Serialize)]
pub struct LearnerStatsResponse {
    pub courses_enrolled: i64,
    pub lessons_completed: i64,
    pub total_points: i64,
    pub badge: &'static str,
}

/// POST /api/v1/lessons/{id}/progress
///
/// Record completion and/or time spent for one lesson. Time accumulates;
/// `completed_at` is write-once.
pub async fn track_lesson(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<TrackProgressRequest>,
) -> AppResult<Json<DataResponse<LessonProgress>>> {
    let Some(course_id) = input.course_id else {
        return Err(AppError::Core(CoreError::Validation(
            "course_id is required".into(),
        )));
    };

    let lesson = load_lesson(&state, lesson_id).await?;
    if lesson.course_id != course_id {
        return Err(AppError::Core(CoreError::Validation(
            "course_id does not match the lesson's course".into(),
        )));
    }

    let time_spent = input.time_spent.unwrap_or(0).max(0);
    let progress = ProgressRepo::upsert(
        &state.pool,
        user.user_id,
        lesson_id,
        course_id,
        input.completed,
        time_spent,
    )
    .await?;

    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/courses/{id}/my-progress
///
/// Completion percentage for the calling learner. A course with no lessons
/// reports 0/0/0.
pub async fn course_progress(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CourseProgressResponse>>> {
    let counts = ProgressRepo::course_counts(&state.pool, user.user_id, course_id).await?;

    Ok(Json(DataResponse {
        data: CourseProgressResponse {
            completion_percentage: completion_percentage(
                counts.completed_lessons,
                counts.total_lessons,
            ),
            completed_lessons: counts.completed_lessons,
            total_lessons: counts.total_lessons,
        },
    }))
}

/// GET /api/v1/users/me/stats
///
/// Lifetime aggregates and the badge derived from total points.
pub async fn my_stats(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LearnerStatsResponse>>> {
    let stats = ProgressRepo::learner_stats(&state.pool, user.user_id).await?;

    Ok(Json(DataResponse {
        data: LearnerStatsResponse {
            courses_enrolled: stats.courses_enrolled,
            lessons_completed: stats.lessons_completed,
            total_points: stats.total_points,
            badge: badge_for_points(stats.total_points),
        },
    }))
}
