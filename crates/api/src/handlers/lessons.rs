//! Handlers for lesson authoring and course content listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnhub_core::access::{can_view_content, CourseAccess};
use learnhub_core::error::CoreError;
use learnhub_core::types::DbId;
use learnhub_db::models::lesson::{Lesson, LessonInput, LessonSummary, LESSON_TYPES};
use learnhub_db::repositories::LessonRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::courses::{ensure_can_manage, load_course};
use crate::handlers::enrollments::enrollment_status;
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/courses/{id}/lessons
///
/// Add a lesson to a course (course owner or admin).
pub async fn create_lesson(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<LessonInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Lesson>>)> {
    validate_lesson_fields(&input)?;

    let course = load_course(&state, course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    let lesson = LessonRepo::create(&state.pool, course_id, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lesson })))
}

/// GET /api/v1/courses/{id}/lessons
///
/// List a course's lessons in display order, gated by the content access
/// decision (published + visibility + enrollment, with an owner/admin
/// bypass).
pub async fn list_lessons(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LessonSummary>>>> {
    let course = load_course(&state, course_id).await?;

    let perms = viewer.as_ref().map(|u| u.permissions());
    let enrollment = match &perms {
        Some(p) => enrollment_status(&state, p.user_id, course_id).await?,
        None => None,
    };

    let access = CourseAccess {
        owner_id: course.created_by,
        is_published: course.is_published,
        visibility: course.visibility.parse()?,
    };
    can_view_content(access, perms.as_ref(), enrollment)?;

    let lessons = LessonRepo::list_by_course(&state.pool, course_id).await?;
    Ok(Json(DataResponse { data: lessons }))
}

/// PUT /api/v1/lessons/{id}
///
/// Replace a lesson's fields (course owner or admin).
pub async fn update_lesson(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<LessonInput>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let lesson = load_lesson(&state, id).await?;
    let course = load_course(&state, lesson.course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    validate_lesson_fields(&input)?;

    let updated = LessonRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/lessons/{id}
///
/// Delete a lesson (course owner or admin).
pub async fn delete_lesson(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let lesson = load_lesson(&state, id).await?;
    let course = load_course(&state, lesson.course_id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    LessonRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a lesson or fail with 404.
pub(crate) async fn load_lesson(state: &AppState, id: DbId) -> AppResult<Lesson> {
    LessonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }))
}

/// First-violation-wins validation for lesson create/update payloads.
fn validate_lesson_fields(input: &LessonInput) -> AppResult<()> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required".into(),
        )));
    }
    if !LESSON_TYPES.contains(&input.lesson_type.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Type must be one of: {}",
            LESSON_TYPES.join(", ")
        ))));
    }
    if input.duration_seconds.is_some_and(|d| d < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Duration seconds must be a non-negative number".into(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::validate_lesson_fields;
    use crate::error::AppError;
    use learnhub_core::error::CoreError;
    use learnhub_db::models::lesson::LessonInput;

    fn input(title: &str, lesson_type: &str, duration: Option<i32>) -> LessonInput {
        LessonInput {
            title: title.into(),
            lesson_type: lesson_type.into(),
            content_url: None,
            duration_seconds: duration,
            allow_download: false,
            description: None,
            order_index: None,
        }
    }

    #[test]
    fn accepts_each_known_type() {
        for lesson_type in ["VIDEO", "DOCUMENT", "IMAGE", "LINK", "QUIZ"] {
            assert!(validate_lesson_fields(&input("Intro", lesson_type, Some(60))).is_ok());
        }
    }

    #[test]
    fn rejects_blank_title_and_unknown_type() {
        assert_matches!(
            validate_lesson_fields(&input(" ", "VIDEO", None)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            validate_lesson_fields(&input("Intro", "AUDIO", None)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn rejects_negative_duration() {
        assert_matches!(
            validate_lesson_fields(&input("Intro", "VIDEO", Some(-5))),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
