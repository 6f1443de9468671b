//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO where the entity supports partial updates

pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod progress;
pub mod quiz;
pub mod reporting;
pub mod review;
pub mod session;
pub mod user;
