//! Handlers for instructor reporting (read-only projections).

use axum::extract::{Path, State};
use axum::Json;
use learnhub_core::progress::completion_percentage;
use learnhub_core::types::DbId;
use learnhub_db::models::reporting::{CompletionStats, InstructorProgressRow, LearnerReportRow};
use learnhub_db::repositories::ReportingRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::courses::{ensure_can_manage, load_course};
use crate::middleware::rbac::RequireInstructor;
use crate::response::DataResponse;
use crate::state::AppState;

/// A learner report row with its derived completion percentage.
#[derive(Debug, Serialize)]
pub struct LearnerReport {
    #[serde(flatten)]
    pub row: LearnerReportRow,
    pub completion_percentage: i32,
}

/// GET /api/v1/reporting/courses/{id}/stats
///
/// Learner counts by completion status for one course (owner or admin).
pub async fn course_stats(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompletionStats>>> {
    let course = load_course(&state, course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    let stats = ReportingRepo::course_completion_stats(&state.pool, course_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/reporting/courses/{id}/learners
///
/// Per-learner progress detail for one course (owner or admin).
pub async fn course_learners(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LearnerReport>>>> {
    let course = load_course(&state, course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    let rows = ReportingRepo::learner_details(&state.pool, course_id).await?;
    let reports = rows
        .into_iter()
        .map(|row| LearnerReport {
            completion_percentage: completion_percentage(row.completed_lessons, row.total_lessons),
            row,
        })
        .collect();

    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/reporting/course-progress
///
/// Progress of every enrollment across all courses the caller owns.
pub async fn instructor_overview(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<InstructorProgressRow>>>> {
    let rows = ReportingRepo::instructor_overview(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: rows }))
}
