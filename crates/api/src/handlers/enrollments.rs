//! Handlers for enrollment, invites, and the caller's enrollment listings.
//!
//! This is the HTTP face of the access-control state machine: handlers load
//! the course and any existing enrollment, ask
//! [`learnhub_core::access::plan_enrollment`] what should happen, and then
//! execute the returned plan against [`EnrollmentRepo`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnhub_core::access::{plan_enrollment, AccessRule, EnrollmentPlan, EnrollmentStatus};
use learnhub_core::error::CoreError;
use learnhub_core::types::DbId;
use learnhub_db::models::enrollment::{
    Enrollment, EnrollmentSummary, EnrollRequest, InviteRequest,
};
use learnhub_db::repositories::{EnrollmentRepo, UserRepo};
use serde::Serialize;

use crate::auth::jwt::{generate_bearer_token, sha256_hex};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::email_looks_valid;
use crate::handlers::courses::load_course;
use crate::middleware::rbac::{RequireAuth, RequireInstructor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a successful invite. The plaintext token appears here and
/// nowhere else; only its hash is stored. (Email delivery is an external
/// collaborator; the instructor forwards the token out of band.)
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub enrollment: Enrollment,
    pub invite_token: String,
}

/// POST /api/v1/courses/{id}/enroll
///
/// Request enrollment under the course's access rule. Idempotent for an
/// already-ACTIVE enrollment (200 with the unchanged row); otherwise 201
/// with the activated row.
pub async fn enroll(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    body: Option<Json<EnrollRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<Enrollment>>)> {
    let input = body.map(|Json(body)| body).unwrap_or_default();

    let course = load_course(&state, course_id).await?;
    if !course.is_published {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot enroll in an unpublished course".into(),
        )));
    }

    let access_rule: AccessRule = course.access_rule.parse()?;
    let existing = EnrollmentRepo::find(&state.pool, user.user_id, course_id).await?;
    let existing_status = existing
        .as_ref()
        .map(|e| e.status.parse::<EnrollmentStatus>())
        .transpose()?;

    let plan = plan_enrollment(
        access_rule,
        existing_status,
        input.invite_token.as_deref(),
        input.payment_txn_id.as_deref(),
    )?;

    let (status, enrollment) = match plan {
        EnrollmentPlan::AlreadyActive => {
            // The plan is only produced from an existing ACTIVE row.
            let enrollment = existing.ok_or_else(|| {
                AppError::InternalError("AlreadyActive plan without an existing row".into())
            })?;
            (StatusCode::OK, enrollment)
        }
        EnrollmentPlan::ActivateDirect | EnrollmentPlan::ClaimInvite => {
            let enrollment =
                EnrollmentRepo::upsert_active(&state.pool, user.user_id, course_id).await?;
            (StatusCode::CREATED, enrollment)
        }
        EnrollmentPlan::RedeemToken { token } => {
            let enrollment = EnrollmentRepo::redeem_invite_token(
                &state.pool,
                user.user_id,
                course_id,
                &sha256_hex(&token),
            )
            .await?
            .ok_or_else(|| {
                // Deliberately vague: does not reveal whether the token, the
                // course, or the invite status mismatched.
                AppError::Core(CoreError::Validation(
                    "Invalid or expired invite token".into(),
                ))
            })?;
            (StatusCode::CREATED, enrollment)
        }
        EnrollmentPlan::ActivatePaid { payment_txn_id } => {
            let enrollment = EnrollmentRepo::upsert_active_paid(
                &state.pool,
                user.user_id,
                course_id,
                &payment_txn_id,
            )
            .await?;
            (StatusCode::CREATED, enrollment)
        }
    };

    tracing::info!(
        user_id = user.user_id,
        course_id,
        status = %enrollment.status,
        "Enrollment request handled"
    );

    Ok((status, Json(DataResponse { data: enrollment })))
}

/// GET /api/v1/users/me/enrollments
pub async fn my_enrollments(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentSummary>>>> {
    let enrollments = EnrollmentRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/v1/users/me/invites
pub async fn my_invites(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentSummary>>>> {
    let invites = EnrollmentRepo::list_pending_invites(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: invites }))
}

/// POST /api/v1/courses/{id}/invite
///
/// Invite a user by email (course owner or admin). Re-inviting rotates the
/// stored token; it is never an error.
pub async fn invite(
    RequireInstructor(user): RequireInstructor,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<InviteRequest>,
) -> AppResult<Json<DataResponse<InviteResponse>>> {
    if !email_looks_valid(&input.email) {
        return Err(AppError::Core(CoreError::Validation(
            "Valid email is required".into(),
        )));
    }

    let course = load_course(&state, course_id).await?;
    if !user.permissions().can_manage(course.created_by) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to invite users to this course".into(),
        )));
    }

    let invited = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found with this email".into()))?;

    let (token_plaintext, token_hash) = generate_bearer_token();
    let enrollment = EnrollmentRepo::upsert_invite(
        &state.pool,
        invited.id,
        course_id,
        &token_hash,
        user.user_id,
    )
    .await?;

    tracing::info!(
        course_id,
        invited_user = invited.id,
        invited_by = user.user_id,
        "Course invite issued"
    );

    Ok(Json(DataResponse {
        data: InviteResponse {
            enrollment,
            invite_token: token_plaintext,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller's enrollment status for a course, for access decisions.
pub(crate) async fn enrollment_status(
    state: &AppState,
    user_id: DbId,
    course_id: DbId,
) -> AppResult<Option<EnrollmentStatus>> {
    let enrollment = EnrollmentRepo::find(&state.pool, user_id, course_id).await?;
    Ok(enrollment
        .map(|e| e.status.parse::<EnrollmentStatus>())
        .transpose()?)
}
