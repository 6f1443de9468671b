//! Pure domain logic for the learnhub platform.
//!
//! This crate has no I/O: the access-control decisions, the enrollment state
//! machine, quiz grading, and progress math all live here so they can be
//! tested in isolation. Persistence lives in `learnhub-db`, HTTP in
//! `learnhub-api`.

pub mod access;
pub mod error;
pub mod progress;
pub mod quiz;
pub mod roles;
pub mod types;
