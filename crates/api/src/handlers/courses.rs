//! Handlers for the `/courses` resource (catalogue and authoring).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use learnhub_core::access::{AccessRule, Permissions, Visibility};
use learnhub_core::error::CoreError;
use learnhub_core::types::DbId;
use learnhub_db::models::course::{
    Course, CourseContentStats, CourseFilters, CourseWithRating, CreateCourse, PageMeta,
    UpdateCourse,
};
use learnhub_db::repositories::CourseRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the catalogue listing.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on the page size a client may request.
const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Paginated course listing.
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub items: Vec<CourseWithRating>,
    pub meta: PageMeta,
}

/// Course detail: the rated course row plus lesson count / total duration.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    pub course: CourseWithRating,
    pub stats: CourseContentStats,
}

/// Request body for `PATCH /courses/{id}/publish`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub is_published: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/courses
///
/// Public catalogue. Anonymous callers see published EVERYONE-visible
/// courses; authenticated callers additionally see SIGNED_IN courses and
/// their own unpublished ones.
pub async fn list_courses(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Query(filters): Query<CourseFilters>,
) -> AppResult<Json<DataResponse<CourseListResponse>>> {
    let page = filters.page.unwrap_or(1).max(1);
    let limit = filters
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let viewer_id = viewer.as_ref().map(|u| u.user_id);
    let title_query = filters.q.as_deref().filter(|q| !q.trim().is_empty());
    let tags: Option<Vec<String>> = filters.tags.as_deref().map(|raw| {
        raw.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    });

    let total = CourseRepo::count(&state.pool, viewer_id, title_query, tags.as_deref()).await?;
    let items = CourseRepo::list(
        &state.pool,
        viewer_id,
        title_query,
        tags.as_deref(),
        limit,
        offset,
    )
    .await?;

    let meta = PageMeta {
        page,
        limit,
        total,
        pages: (total + limit - 1) / limit,
    };

    Ok(Json(DataResponse {
        data: CourseListResponse { items, meta },
    }))
}

/// GET /api/v1/courses/{id}
///
/// Course detail. Bumps the view counter. SIGNED_IN-visible courses
/// require authentication; unpublished courses are only shown to their
/// owner or an admin.
pub async fn get_course(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CourseDetailResponse>>> {
    let course = load_course(&state, id).await?;
    let perms = viewer.as_ref().map(|u| u.permissions());

    if !course.is_published && !perms.as_ref().is_some_and(|p| p.can_manage(course.created_by)) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Course is not published".into(),
        )));
    }

    let visibility: Visibility = course.visibility.parse()?;
    if visibility == Visibility::SignedIn && perms.is_none() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Authentication required to view this course".into(),
        )));
    }

    let (course, stats) = CourseRepo::find_with_stats(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    Ok(Json(DataResponse {
        data: CourseDetailResponse { course, stats },
    }))
}

/// POST /api/v1/courses
///
/// Create a course (instructor/admin). Courses start unpublished.
pub async fn create_course(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    validate_course_fields(
        &input.title,
        &input.visibility,
        &input.access_rule,
        input.price_cents,
    )?;

    let course = CourseRepo::create(&state.pool, &input, user.user_id).await?;

    tracing::info!(course_id = course.id, created_by = user.user_id, "Course created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// PUT /api/v1/courses/{id}
///
/// Replace a course's mutable fields (owner or admin).
pub async fn update_course(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = load_course(&state, id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    validate_course_fields(
        &input.title,
        &input.visibility,
        &input.access_rule,
        input.price_cents,
    )?;

    let updated = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/courses/{id}/publish
///
/// Flip the publish flag (owner or admin). Publishing gates enrollment and
/// learner visibility.
pub async fn publish_course(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = load_course(&state, id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    let updated = CourseRepo::set_published(&state.pool, id, input.is_published)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    tracing::info!(course_id = id, is_published = input.is_published, "Course publish flag set");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/courses/{id}
///
/// Delete a course and (via cascade) its lessons, quizzes, enrollments,
/// and progress. Owner or admin only.
pub async fn delete_course(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let course = load_course(&state, id).await?;
    ensure_can_manage(&user.permissions(), &course)?;

    CourseRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared helpers (used by lesson / quiz / reporting handlers too)
// ---------------------------------------------------------------------------

/// Load a course or fail with 404.
pub(crate) async fn load_course(state: &AppState, id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
}

/// Owner-or-admin gate shared by every course-scoped mutation.
pub(crate) fn ensure_can_manage(perms: &Permissions, course: &Course) -> AppResult<()> {
    if perms.can_manage(course.created_by) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to manage this course".into(),
        )))
    }
}

/// First-violation-wins validation for course create/update payloads.
fn validate_course_fields(
    title: &str,
    visibility: &str,
    access_rule: &str,
    price_cents: Option<i64>,
) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required and must be a non-empty string".into(),
        )));
    }

    let _: Visibility = visibility.parse()?;
    let access_rule: AccessRule = access_rule.parse()?;

    // Price only carries meaning under the PAID rule, where it is required.
    if access_rule == AccessRule::Paid {
        match price_cents {
            Some(price) if price >= 0 => {}
            _ => {
                return Err(AppError::Core(CoreError::Validation(
                    "Price in cents is required and must be non-negative when access rule is PAID"
                        .into(),
                )))
            }
        }
    } else if price_cents.is_some_and(|price| price < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Price in cents must be non-negative".into(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::validate_course_fields;
    use crate::error::AppError;
    use learnhub_core::error::CoreError;

    #[test]
    fn valid_open_course_passes() {
        assert!(validate_course_fields("Rust 101", "EVERYONE", "OPEN", None).is_ok());
    }

    #[test]
    fn title_is_checked_first() {
        let result = validate_course_fields("   ", "BOGUS", "BOGUS", None);
        assert_matches!(result, Err(AppError::Core(CoreError::Validation(msg))) => {
            assert!(msg.contains("Title"), "first violation should win, got: {msg}");
        });
    }

    #[test]
    fn invalid_enums_rejected() {
        assert_matches!(
            validate_course_fields("T", "PUBLIC", "OPEN", None),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            validate_course_fields("T", "EVERYONE", "FREE", None),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn paid_course_requires_price() {
        assert_matches!(
            validate_course_fields("T", "EVERYONE", "PAID", None),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert!(validate_course_fields("T", "EVERYONE", "PAID", Some(4999)).is_ok());
    }

    #[test]
    fn negative_price_rejected_everywhere() {
        assert_matches!(
            validate_course_fields("T", "EVERYONE", "PAID", Some(-1)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            validate_course_fields("T", "EVERYONE", "OPEN", Some(-1)),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
