//! Route tree assembly.

pub mod auth;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod quizzes;
pub mod reporting;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /courses                             list (public), create (instructor)
/// /courses/{id}                        get (public), update, delete (owner/admin)
/// /courses/{id}/publish                set publish flag (owner/admin, PATCH)
/// /courses/{id}/enroll                 enroll under the access rule (POST)
/// /courses/{id}/invite                 invite a user by email (owner/admin, POST)
/// /courses/{id}/lessons                list (access-gated), create (owner/admin)
/// /courses/{id}/my-progress            caller's completion summary (GET)
/// /courses/{id}/reviews                list (public), add (auth, POST)
///
/// /lessons/{id}                        update, delete (owner/admin)
/// /lessons/{id}/progress               record completion / time spent (POST)
///
/// /quizzes                             create (instructor, POST)
/// /quizzes/{id}                        quiz + questions + rewards (auth)
/// /quizzes/{id}/questions              add question (owner/admin, POST)
/// /quizzes/{id}/questions/{qid}        replace, delete (owner/admin)
/// /quizzes/{id}/rewards                set reward tiers (owner/admin, POST)
/// /quizzes/{id}/submit                 grade an attempt (auth, POST)
///
/// /users/me/enrollments                caller's enrollments (GET)
/// /users/me/invites                    caller's pending invites (GET)
/// /users/me/stats                      lifetime stats + badge (GET)
///
/// /reviews/{id}                        delete (author or admin)
///
/// /reporting/courses/{id}/stats        completion-status counts (owner/admin)
/// /reporting/courses/{id}/learners     per-learner detail (owner/admin)
/// /reporting/course-progress           caller's whole-catalogue overview
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Course catalogue, authoring, and course-scoped sub-resources.
        .nest("/courses", courses::router())
        // Lesson-scoped operations (edit, delete, progress tracking).
        .nest("/lessons", lessons::router())
        // Quiz authoring, delivery, and submission.
        .nest("/quizzes", quizzes::router())
        // The caller's own listings and stats.
        .nest("/users/me", users::router())
        // Review deletion (course-scoped review routes live under /courses).
        .nest("/reviews", reviews::router())
        // Instructor reporting projections.
        .nest("/reporting", reporting::router())
}
