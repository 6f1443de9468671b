//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod progress;
pub mod quizzes;
pub mod reporting;
pub mod reviews;
