//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose resolved
//! [`Permissions`] do not meet the minimum requirement. The super-admin
//! override is honored by `Permissions` itself, so no extractor checks the
//! flag directly.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use learnhub_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly so route
/// definitions read as "this route requires authentication".
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires `instructor` or `admin` role (or the super-admin override).
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn instructors_only(RequireInstructor(user): RequireInstructor) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireInstructor(pub AuthUser);

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.permissions().is_instructor() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Instructor or Admin role required".into(),
            )));
        }
        Ok(RequireInstructor(user))
    }
}

/// Requires the `admin` role (or the super-admin override). Rejects with
/// 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.permissions().is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
