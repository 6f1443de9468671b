//! Course access rules, the enrollment state machine, and permission
//! resolution.
//!
//! Everything here is a pure function over already-loaded data. The HTTP
//! layer loads the course and enrollment rows, asks this module what to do,
//! and then executes the returned plan against the repositories. That keeps
//! the one genuinely tricky state machine in the system testable without a
//! database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_INSTRUCTOR};
use crate::types::DbId;

/// Minimum length for a payment transaction reference. There is no real
/// payment verification in scope; this is only a plausibility check.
pub const MIN_PAYMENT_REF_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Enums stored as TEXT columns
// ---------------------------------------------------------------------------

/// Who may see that a course exists at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "EVERYONE")]
    Everyone,
    #[serde(rename = "SIGNED_IN")]
    SignedIn,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Everyone => "EVERYONE",
            Visibility::SignedIn => "SIGNED_IN",
        }
    }
}

impl FromStr for Visibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVERYONE" => Ok(Visibility::Everyone),
            "SIGNED_IN" => Ok(Visibility::SignedIn),
            _ => Err(CoreError::Validation(
                "Visibility must be one of: EVERYONE, SIGNED_IN".into(),
            )),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a learner gains access to a course's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRule {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "INVITE")]
    Invite,
    #[serde(rename = "PAID")]
    Paid,
}

impl AccessRule {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessRule::Open => "OPEN",
            AccessRule::Invite => "INVITE",
            AccessRule::Paid => "PAID",
        }
    }
}

impl FromStr for AccessRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(AccessRule::Open),
            "INVITE" => Ok(AccessRule::Invite),
            "PAID" => Ok(AccessRule::Paid),
            _ => Err(CoreError::Validation(
                "Access rule must be one of: OPEN, INVITE, PAID".into(),
            )),
        }
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enrollment lifecycle states.
///
/// `INVITED -> ACTIVE` happens via token redemption or self-claim;
/// `ACTIVE -> COMPLETED` and `* -> CANCELLED` are set externally. No
/// transition ever deletes the row; re-enrollment is an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    #[serde(rename = "INVITED")]
    Invited,
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Invited => "INVITED",
            EnrollmentStatus::Active => "ACTIVE",
            EnrollmentStatus::Completed => "COMPLETED",
            EnrollmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INVITED" => Ok(EnrollmentStatus::Invited),
            "ACTIVE" => Ok(EnrollmentStatus::Active),
            "COMPLETED" => Ok(EnrollmentStatus::Completed),
            "CANCELLED" => Ok(EnrollmentStatus::Cancelled),
            _ => Err(CoreError::Internal(format!(
                "Unknown enrollment status in store: {s}"
            ))),
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Permission resolution
// ---------------------------------------------------------------------------

/// Resolved capabilities of an authenticated caller.
///
/// The super-admin flag bypasses every role and ownership check in the
/// system. It is consulted here and nowhere else, so the override semantics
/// stay in one place.
#[derive(Debug, Clone)]
pub struct Permissions {
    pub user_id: DbId,
    pub role: String,
    pub is_super_admin: bool,
}

impl Permissions {
    pub fn new(user_id: DbId, role: impl Into<String>, is_super_admin: bool) -> Self {
        Self {
            user_id,
            role: role.into(),
            is_super_admin,
        }
    }

    /// Does the caller own the given resource?
    pub fn owns(&self, owner_id: DbId) -> bool {
        self.user_id == owner_id
    }

    pub fn is_admin(&self) -> bool {
        self.is_super_admin || self.role == ROLE_ADMIN
    }

    /// Admins count as instructors for every instructor-gated action.
    pub fn is_instructor(&self) -> bool {
        self.is_admin() || self.role == ROLE_INSTRUCTOR
    }

    /// Owner-or-admin: the authorization rule applied by every mutating
    /// endpoint that operates on a specific course or its children.
    pub fn can_manage(&self, owner_id: DbId) -> bool {
        self.owns(owner_id) || self.is_admin()
    }
}

// ---------------------------------------------------------------------------
// Content access decision
// ---------------------------------------------------------------------------

/// The slice of a course row the access decision needs.
#[derive(Debug, Clone, Copy)]
pub struct CourseAccess {
    pub owner_id: DbId,
    pub is_published: bool,
    pub visibility: Visibility,
}

/// Decide whether `viewer` may read a course's lessons and quizzes.
///
/// A user may view content when the course is published, its visibility
/// admits the caller, and the caller is either owner/admin or holds an
/// ACTIVE or COMPLETED enrollment. Unpublished courses are visible to
/// owner/admin only.
pub fn can_view_content(
    course: CourseAccess,
    viewer: Option<&Permissions>,
    enrollment: Option<EnrollmentStatus>,
) -> Result<(), CoreError> {
    if let Some(perms) = viewer {
        if perms.can_manage(course.owner_id) {
            return Ok(());
        }
    }

    if !course.is_published {
        return Err(CoreError::Forbidden("Course is not published".into()));
    }

    let Some(_perms) = viewer else {
        // Anonymous callers can never hold an enrollment, so content is
        // unreachable for them even on EVERYONE-visible courses.
        return Err(CoreError::Unauthorized(
            "Authentication required to view course content".into(),
        ));
    };

    match enrollment {
        Some(EnrollmentStatus::Active) | Some(EnrollmentStatus::Completed) => Ok(()),
        _ => Err(CoreError::Forbidden(
            "You are not enrolled in this course".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Enrollment state machine
// ---------------------------------------------------------------------------

/// The declarative outcome of an enrollment request. The caller executes
/// the plan against the store; planning itself touches no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentPlan {
    /// An ACTIVE enrollment already exists; return it unchanged.
    AlreadyActive,
    /// Create or upsert the enrollment straight to ACTIVE.
    ActivateDirect,
    /// The caller already holds a pending invite; activate it without
    /// requiring the token to be echoed back.
    ClaimInvite,
    /// Verify the supplied token against the stored INVITED row for this
    /// exact (user, course) pair, activating on match.
    RedeemToken { token: String },
    /// Activate and record the payment reference.
    ActivatePaid { payment_txn_id: String },
}

/// Plan the enrollment transition for one request.
///
/// Preconditions (course exists, course is published) are checked by the
/// caller before planning. The ACTIVE short-circuit applies regardless of
/// access rule, which also makes "wrong token after activation" succeed
/// idempotently instead of failing.
pub fn plan_enrollment(
    access_rule: AccessRule,
    existing: Option<EnrollmentStatus>,
    invite_token: Option<&str>,
    payment_txn_id: Option<&str>,
) -> Result<EnrollmentPlan, CoreError> {
    if existing == Some(EnrollmentStatus::Active) {
        return Ok(EnrollmentPlan::AlreadyActive);
    }

    match access_rule {
        AccessRule::Open => Ok(EnrollmentPlan::ActivateDirect),

        AccessRule::Invite => {
            if existing == Some(EnrollmentStatus::Invited) {
                return Ok(EnrollmentPlan::ClaimInvite);
            }
            match invite_token {
                Some(token) if !token.is_empty() => Ok(EnrollmentPlan::RedeemToken {
                    token: token.to_string(),
                }),
                _ => Err(CoreError::Validation(
                    "Invite token is required for this course".into(),
                )),
            }
        }

        AccessRule::Paid => match payment_txn_id {
            Some(txn) if txn.len() >= MIN_PAYMENT_REF_LEN => Ok(EnrollmentPlan::ActivatePaid {
                payment_txn_id: txn.to_string(),
            }),
            _ => Err(CoreError::Validation(
                "Valid payment transaction ID is required".into(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::ROLE_LEARNER;

    fn learner(id: DbId) -> Permissions {
        Permissions::new(id, ROLE_LEARNER, false)
    }

    // -----------------------------------------------------------------------
    // Permissions
    // -----------------------------------------------------------------------

    #[test]
    fn super_admin_overrides_every_check() {
        let perms = Permissions::new(7, ROLE_LEARNER, true);
        assert!(perms.is_admin());
        assert!(perms.is_instructor());
        assert!(perms.can_manage(999));
        assert!(!perms.owns(999), "override must not pretend ownership");
    }

    #[test]
    fn admin_role_implies_instructor() {
        let perms = Permissions::new(1, ROLE_ADMIN, false);
        assert!(perms.is_admin());
        assert!(perms.is_instructor());
        assert!(perms.can_manage(42));
    }

    #[test]
    fn instructor_is_not_admin() {
        let perms = Permissions::new(1, ROLE_INSTRUCTOR, false);
        assert!(!perms.is_admin());
        assert!(perms.is_instructor());
        assert!(!perms.can_manage(42));
        assert!(perms.can_manage(1), "ownership still grants management");
    }

    #[test]
    fn learner_has_no_elevated_capability() {
        let perms = learner(3);
        assert!(!perms.is_admin());
        assert!(!perms.is_instructor());
        assert!(perms.can_manage(3));
        assert!(!perms.can_manage(4));
    }

    // -----------------------------------------------------------------------
    // Content access decision
    // -----------------------------------------------------------------------

    fn published(owner: DbId, visibility: Visibility) -> CourseAccess {
        CourseAccess {
            owner_id: owner,
            is_published: true,
            visibility,
        }
    }

    #[test]
    fn owner_sees_unpublished_course() {
        let course = CourseAccess {
            owner_id: 1,
            is_published: false,
            visibility: Visibility::Everyone,
        };
        assert!(can_view_content(course, Some(&learner(1)), None).is_ok());
    }

    #[test]
    fn admin_sees_unpublished_course() {
        let course = CourseAccess {
            owner_id: 1,
            is_published: false,
            visibility: Visibility::Everyone,
        };
        let admin = Permissions::new(2, ROLE_ADMIN, false);
        assert!(can_view_content(course, Some(&admin), None).is_ok());
    }

    #[test]
    fn unpublished_course_hidden_from_enrolled_learner() {
        let course = CourseAccess {
            owner_id: 1,
            is_published: false,
            visibility: Visibility::Everyone,
        };
        let result = can_view_content(
            course,
            Some(&learner(2)),
            Some(EnrollmentStatus::Active),
        );
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn anonymous_caller_is_asked_to_authenticate() {
        let result = can_view_content(published(1, Visibility::Everyone), None, None);
        assert_matches!(result, Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn active_and_completed_enrollments_grant_access() {
        for status in [EnrollmentStatus::Active, EnrollmentStatus::Completed] {
            let result = can_view_content(
                published(1, Visibility::SignedIn),
                Some(&learner(2)),
                Some(status),
            );
            assert!(result.is_ok(), "{status} should grant access");
        }
    }

    #[test]
    fn invited_and_cancelled_enrollments_do_not_grant_access() {
        for status in [EnrollmentStatus::Invited, EnrollmentStatus::Cancelled] {
            let result = can_view_content(
                published(1, Visibility::Everyone),
                Some(&learner(2)),
                Some(status),
            );
            assert_matches!(result, Err(CoreError::Forbidden(_)), "{status}");
        }
    }

    #[test]
    fn no_enrollment_means_no_access() {
        let result = can_view_content(published(1, Visibility::Everyone), Some(&learner(2)), None);
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    // -----------------------------------------------------------------------
    // Enrollment planning
    // -----------------------------------------------------------------------

    #[test]
    fn open_course_always_activates() {
        // Regardless of prior INVITED/CANCELLED state.
        for existing in [
            None,
            Some(EnrollmentStatus::Invited),
            Some(EnrollmentStatus::Cancelled),
        ] {
            let plan = plan_enrollment(AccessRule::Open, existing, None, None).unwrap();
            assert_eq!(plan, EnrollmentPlan::ActivateDirect);
        }
    }

    #[test]
    fn active_enrollment_short_circuits_for_every_rule() {
        for rule in [AccessRule::Open, AccessRule::Invite, AccessRule::Paid] {
            let plan =
                plan_enrollment(rule, Some(EnrollmentStatus::Active), None, None).unwrap();
            assert_eq!(plan, EnrollmentPlan::AlreadyActive);
        }
    }

    #[test]
    fn wrong_token_after_activation_still_succeeds() {
        // Documented idempotent-success behaviour: the ACTIVE short-circuit
        // wins before any token inspection.
        let plan = plan_enrollment(
            AccessRule::Invite,
            Some(EnrollmentStatus::Active),
            Some("definitely-wrong"),
            None,
        )
        .unwrap();
        assert_eq!(plan, EnrollmentPlan::AlreadyActive);
    }

    #[test]
    fn pending_invite_is_claimed_without_token() {
        let plan =
            plan_enrollment(AccessRule::Invite, Some(EnrollmentStatus::Invited), None, None)
                .unwrap();
        assert_eq!(plan, EnrollmentPlan::ClaimInvite);
    }

    #[test]
    fn invite_rule_requires_token_when_no_invite_exists() {
        let result = plan_enrollment(AccessRule::Invite, None, None, None);
        assert_matches!(result, Err(CoreError::Validation(msg)) => {
            assert!(msg.contains("Invite token"));
        });
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let result = plan_enrollment(AccessRule::Invite, None, Some(""), None);
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn supplied_token_is_redeemed() {
        let plan = plan_enrollment(AccessRule::Invite, None, Some("tok-abc"), None).unwrap();
        assert_eq!(
            plan,
            EnrollmentPlan::RedeemToken {
                token: "tok-abc".into()
            }
        );
    }

    #[test]
    fn paid_rule_rejects_short_or_missing_reference() {
        for txn in [None, Some(""), Some("abcd")] {
            let result = plan_enrollment(AccessRule::Paid, None, None, txn);
            assert_matches!(result, Err(CoreError::Validation(_)), "txn={txn:?}");
        }
    }

    #[test]
    fn paid_rule_accepts_plausible_reference() {
        let plan = plan_enrollment(AccessRule::Paid, None, None, Some("txn_12345")).unwrap();
        assert_eq!(
            plan,
            EnrollmentPlan::ActivatePaid {
                payment_txn_id: "txn_12345".into()
            }
        );
    }

    // -----------------------------------------------------------------------
    // Enum round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn enums_round_trip_through_text() {
        for v in [Visibility::Everyone, Visibility::SignedIn] {
            assert_eq!(v.as_str().parse::<Visibility>().unwrap(), v);
        }
        for r in [AccessRule::Open, AccessRule::Invite, AccessRule::Paid] {
            assert_eq!(r.as_str().parse::<AccessRule>().unwrap(), r);
        }
        for s in [
            EnrollmentStatus::Invited,
            EnrollmentStatus::Active,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Cancelled,
        ] {
            assert_eq!(s.as_str().parse::<EnrollmentStatus>().unwrap(), s);
        }
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        assert_matches!("PUBLIC".parse::<Visibility>(), Err(CoreError::Validation(_)));
        assert_matches!("FREE".parse::<AccessRule>(), Err(CoreError::Validation(_)));
    }
}
