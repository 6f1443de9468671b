//! Route definitions for `/lessons`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::{lessons, progress};
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// PUT    /{id}           -> update_lesson (owner/admin)
/// DELETE /{id}           -> delete_lesson (owner/admin)
/// POST   /{id}/progress  -> track_lesson (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(lessons::update_lesson).delete(lessons::delete_lesson),
        )
        .route("/{id}/progress", post(progress::track_lesson))
}
