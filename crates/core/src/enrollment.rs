//! Enrollment model - one user's progress through one course.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, EnrollmentId, UserId};
use crate::Time;

/// Progress value at which a course counts as completed.
pub const COMPLETE_PROGRESS: u8 = 100;

/// The relationship and progress state between one user and one course.
///
/// `status` is always derived from `progress`; callers change both together
/// through [`Enrollment::set_progress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique identifier
    pub id: EnrollmentId,

    /// Enrolled user
    pub user_id: UserId,

    /// Course enrolled in
    pub course_id: CourseId,

    /// Percentage complete (0-100)
    pub progress: u8,

    /// Derived completion status
    pub status: CompletionStatus,

    /// When enrolled
    pub created_at: Time,

    /// Last progress change
    pub updated_at: Time,
}

impl Enrollment {
    /// Create a fresh enrollment with no progress.
    pub fn new(user_id: UserId, course_id: CourseId, now: Time) -> Self {
        Self {
            id: EnrollmentId::new(),
            user_id,
            course_id,
            progress: 0,
            status: CompletionStatus::NotStarted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set progress and the matching status.
    pub fn set_progress(&mut self, progress: u8, now: Time) {
        self.progress = progress;
        self.status = CompletionStatus::from_progress(progress);
        self.updated_at = now;
    }

    /// Whether the course is completed.
    pub fn is_completed(&self) -> bool {
        self.status == CompletionStatus::Completed
    }
}

/// Completion status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    /// Progress is zero
    NotStarted,
    /// Progress is between 1 and 99
    InProgress,
    /// Progress is 100
    Completed,
}

impl CompletionStatus {
    /// Classify a progress value.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => CompletionStatus::NotStarted,
            p if p >= COMPLETE_PROGRESS => CompletionStatus::Completed,
            _ => CompletionStatus::InProgress,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::NotStarted => "NOT_STARTED",
            CompletionStatus::InProgress => "IN_PROGRESS",
            CompletionStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
