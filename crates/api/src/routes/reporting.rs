//! Route definitions for `/reporting` (instructor projections).

use axum::routing::get;
use axum::Router;

use crate::handlers::reporting;
use crate::state::AppState;

/// Routes mounted at `/reporting`. All require the instructor (or admin)
/// role; course-scoped reports additionally require ownership.
///
/// ```text
/// GET /courses/{id}/stats     -> course_stats
/// GET /courses/{id}/learners  -> course_learners
/// GET /course-progress        -> instructor_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/stats", get(reporting::course_stats))
        .route("/courses/{id}/learners", get(reporting::course_learners))
        .route("/course-progress", get(reporting::instructor_overview))
}
