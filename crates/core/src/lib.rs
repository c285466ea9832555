//! EduQuest core data models.
//!
//! This crate defines the records the progress engine reads and writes:
//! users and their activity state, courses, enrollments and achievements.

#![warn(missing_docs)]

// Core identities
mod id;

// People and content
mod user;
mod course;

// Learning state
mod enrollment;
mod achievement;

// Re-exports
pub use id::*;

pub use user::{User, Role, ActivityState};
pub use course::{Course, Level};
pub use enrollment::{Enrollment, CompletionStatus, COMPLETE_PROGRESS};
pub use achievement::{Achievement, AchievementType};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// A string did not name any variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
