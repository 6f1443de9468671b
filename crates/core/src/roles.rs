//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the schema.
//! Roles are stored lowercase; the super-admin override is a separate
//! boolean column, resolved through [`crate::access::Permissions`].

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_LEARNER: &str = "learner";
