//! Route definitions for `/users/me` (the caller's own data).

use axum::routing::get;
use axum::Router;

use crate::handlers::{enrollments, progress};
use crate::state::AppState;

/// Routes mounted at `/users/me`. All require authentication.
///
/// ```text
/// GET /enrollments  -> my_enrollments
/// GET /invites      -> my_invites
/// GET /stats        -> my_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(enrollments::my_enrollments))
        .route("/invites", get(enrollments::my_invites))
        .route("/stats", get(progress::my_stats))
}
