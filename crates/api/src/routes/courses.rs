//! Route definitions for `/courses` and its course-scoped sub-resources.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{courses, enrollments, lessons, progress, reviews};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                   -> list_courses (public)
/// POST   /                   -> create_course (instructor)
/// GET    /{id}               -> get_course (public)
/// PUT    /{id}               -> update_course (owner/admin)
/// DELETE /{id}               -> delete_course (owner/admin)
/// PATCH  /{id}/publish       -> publish_course (owner/admin)
/// POST   /{id}/enroll        -> enroll (auth)
/// POST   /{id}/invite        -> invite (owner/admin)
/// GET    /{id}/lessons       -> list_lessons (access-gated)
/// POST   /{id}/lessons       -> create_lesson (owner/admin)
/// GET    /{id}/my-progress   -> course_progress (auth)
/// GET    /{id}/reviews       -> list_reviews (public)
/// POST   /{id}/reviews       -> add_review (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route("/{id}/publish", patch(courses::publish_course))
        .route("/{id}/enroll", post(enrollments::enroll))
        .route("/{id}/invite", post(enrollments::invite))
        .route(
            "/{id}/lessons",
            get(lessons::list_lessons).post(lessons::create_lesson),
        )
        .route("/{id}/my-progress", get(progress::course_progress))
        .route(
            "/{id}/reviews",
            get(reviews::list_reviews).post(reviews::add_review),
        )
}
