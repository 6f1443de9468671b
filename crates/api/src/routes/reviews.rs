//! Route definitions for `/reviews`.
//!
//! Listing and creation are course-scoped and live under `/courses`.

use axum::routing::delete;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// DELETE /{id}  -> delete_review (author or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(reviews::delete_review))
}
