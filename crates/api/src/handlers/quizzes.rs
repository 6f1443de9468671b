//! Handlers for quiz authoring, delivery, and attempt submission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnhub_core::access::{can_view_content, CourseAccess};
use learnhub_core::error::CoreError;
use learnhub_core::quiz::{validate_options, OptionInput, SubmittedAnswer};
use learnhub_core::types::DbId;
use learnhub_db::models::quiz::{
    CreateQuiz, OptionPublic, Question, Quiz, QuizFull, QuizRewards, SetRewards,
    SubmissionResult,
};
use learnhub_db::repositories::QuizRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::courses::{ensure_can_manage, load_course};
use crate::handlers::enrollments::enrollment_status;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body for adding or replacing a question.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question_text: String,
    pub order_index: Option<i32>,
    pub options: Vec<OptionInput>,
}

/// Request body for `POST /quizzes/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: Vec<SubmittedAnswer>,
}

/// A question as shown to a learner taking the quiz: options carry no
/// correctness flags.
#[derive(Debug, Serialize)]
pub struct QuestionPublic {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<OptionPublic>,
}

/// Learner-facing quiz payload.
#[derive(Debug, Serialize)]
pub struct QuizPublic {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionPublic>,
    pub rewards: Option<QuizRewards>,
}

/// Either the full authoring view or the stripped learner view of a quiz.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuizView {
    Full(QuizFull),
    Public(QuizPublic),
}

// ---------------------------------------------------------------------------
// Authoring handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/quizzes
///
/// Create a quiz for a course (course owner or admin).
pub async fn create_quiz(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Json(input): Json<CreateQuiz>,
) -> AppResult<(StatusCode, Json<DataResponse<Quiz>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "course_id and title are required".into(),
        )));
    }

    let course = load_course(&state, input.course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    let quiz = QuizRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: quiz })))
}

/// POST /api/v1/quizzes/{id}/questions
///
/// Add a question with its option set. The option set must be well formed:
/// at least two options, exactly one correct.
pub async fn add_question(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<QuestionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Question>>)> {
    let quiz = load_quiz(&state, quiz_id).await?;
    ensure_quiz_manager(&state, &user, &quiz).await?;
    validate_question(&input)?;

    let question = QuizRepo::add_question(
        &state.pool,
        quiz_id,
        input.question_text.trim(),
        input.order_index.unwrap_or(0),
        &input.options,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// PUT /api/v1/quizzes/{id}/questions/{question_id}
///
/// Replace a question's text and its entire option set atomically.
pub async fn update_question(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(DbId, DbId)>,
    Json(input): Json<QuestionRequest>,
) -> AppResult<Json<DataResponse<Question>>> {
    let quiz = load_question_quiz(&state, quiz_id, question_id).await?;
    ensure_quiz_manager(&state, &user, &quiz).await?;
    validate_question(&input)?;

    let question = QuizRepo::update_question(
        &state.pool,
        question_id,
        input.question_text.trim(),
        &input.options,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Question",
        id: question_id,
    }))?;

    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/quizzes/{id}/questions/{question_id}
pub async fn delete_question(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let quiz = load_question_quiz(&state, quiz_id, question_id).await?;
    ensure_quiz_manager(&state, &user, &quiz).await?;

    let deleted = QuizRepo::delete_question(&state.pool, question_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/quizzes/{id}/rewards
///
/// Upsert all four reward tier values together.
pub async fn set_rewards(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<SetRewards>,
) -> AppResult<Json<DataResponse<QuizRewards>>> {
    let quiz = load_quiz(&state, quiz_id).await?;
    ensure_quiz_manager(&state, &user, &quiz).await?;

    let rewards = QuizRepo::set_rewards(&state.pool, quiz_id, &input).await?;
    Ok(Json(DataResponse { data: rewards }))
}

// ---------------------------------------------------------------------------
// Delivery handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/quizzes/{id}
///
/// Fetch a quiz with its questions, options, and rewards. Managers get the
/// full authoring view; learners get options without correctness flags.
pub async fn get_quiz(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuizView>>> {
    let full = QuizRepo::find_full(&state.pool, quiz_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quiz",
            id: quiz_id,
        }))?;

    let course = load_course(&state, full.quiz.course_id).await?;
    let perms = user.permissions();

    if perms.can_manage(course.created_by) {
        return Ok(Json(DataResponse {
            data: QuizView::Full(full),
        }));
    }

    // Learners go through the standard content access decision.
    let enrollment = enrollment_status(&state, user.user_id, course.id).await?;
    let access = CourseAccess {
        owner_id: course.created_by,
        is_published: course.is_published,
        visibility: course.visibility.parse()?,
    };
    can_view_content(access, Some(&perms), enrollment)?;

    let questions = full
        .questions
        .into_iter()
        .map(|entry| QuestionPublic {
            question: entry.question,
            options: entry.options.into_iter().map(OptionPublic::from).collect(),
        })
        .collect();

    Ok(Json(DataResponse {
        data: QuizView::Public(QuizPublic {
            quiz: full.quiz,
            questions,
            rewards: full.rewards,
        }),
    }))
}

/// POST /api/v1/quizzes/{id}/submit
///
/// Grade and persist one attempt. Returns the attempt plus raw counts so
/// the results screen needs no recomputation.
pub async fn submit_quiz(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(quiz_id): Path<DbId>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<DataResponse<SubmissionResult>>> {
    let quiz = load_quiz(&state, quiz_id).await?;
    let course = load_course(&state, quiz.course_id).await?;

    let perms = user.permissions();
    if !perms.can_manage(course.created_by) {
        let enrollment = enrollment_status(&state, user.user_id, course.id).await?;
        let access = CourseAccess {
            owner_id: course.created_by,
            is_published: course.is_published,
            visibility: course.visibility.parse()?,
        };
        can_view_content(access, Some(&perms), enrollment)?;
    }

    let result = QuizRepo::submit_attempt(&state.pool, &quiz, user.user_id, &input.answers).await?;

    tracing::info!(
        quiz_id,
        user_id = user.user_id,
        score = result.score,
        attempt_number = result.attempt.attempt_number,
        points_earned = result.attempt.points_earned,
        "Quiz attempt graded"
    );

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a quiz or fail with 404.
async fn load_quiz(state: &AppState, id: DbId) -> AppResult<Quiz> {
    QuizRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quiz", id }))
}

/// Resolve a question's owning quiz and require it to match the quiz named
/// in the path, so a crafted URL cannot edit another quiz's question.
async fn load_question_quiz(
    state: &AppState,
    quiz_id: DbId,
    question_id: DbId,
) -> AppResult<Quiz> {
    let quiz = QuizRepo::find_by_question(&state.pool, question_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }))?;
    if quiz.id != quiz_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }));
    }
    Ok(quiz)
}

/// Owner-or-admin gate for quiz mutations, resolved through the owning
/// course.
async fn ensure_quiz_manager(state: &AppState, user: &AuthUser, quiz: &Quiz) -> AppResult<()> {
    let course = load_course(state, quiz.course_id).await?;
    ensure_can_manage(&user.permissions(), &course)
}

/// First-violation-wins validation for question payloads.
fn validate_question(input: &QuestionRequest) -> AppResult<()> {
    if input.question_text.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Question text is required".into(),
        )));
    }
    validate_options(&input.options)?;
    Ok(())
}
