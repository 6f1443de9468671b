//! Route definitions for `/quizzes`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::quizzes;
use crate::state::AppState;

/// Routes mounted at `/quizzes`.
///
/// ```text
/// POST   /                          -> create_quiz (instructor)
/// GET    /{id}                      -> get_quiz (auth)
/// POST   /{id}/questions            -> add_question (owner/admin)
/// PUT    /{id}/questions/{qid}      -> update_question (owner/admin)
/// DELETE /{id}/questions/{qid}      -> delete_question (owner/admin)
/// POST   /{id}/rewards              -> set_rewards (owner/admin)
/// POST   /{id}/submit               -> submit_quiz (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(quizzes::create_quiz))
        .route("/{id}", get(quizzes::get_quiz))
        .route("/{id}/questions", post(quizzes::add_question))
        .route(
            "/{id}/questions/{question_id}",
            put(quizzes::update_question).delete(quizzes::delete_question),
        )
        .route("/{id}/rewards", post(quizzes::set_rewards))
        .route("/{id}/submit", post(quizzes::submit_quiz))
}
