//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement operations open
//! their own transaction so a mid-sequence failure rolls back every prior
//! statement; idempotent writes use `INSERT ... ON CONFLICT` upserts
//! instead of read-then-write.

pub mod course_repo;
pub mod enrollment_repo;
pub mod lesson_repo;
pub mod progress_repo;
pub mod quiz_repo;
pub mod reporting_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use lesson_repo::LessonRepo;
pub use progress_repo::ProgressRepo;
pub use quiz_repo::QuizRepo;
pub use reporting_repo::ReportingRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
