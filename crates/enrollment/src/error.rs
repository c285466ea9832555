//! Engine error type.

use eduquest_core::{CourseId, Role, UserId};
use eduquest_progress::ProgressError;
use eduquest_storage::StorageError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Typed failures reported to callers. None are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Progress update or unenroll for a pair with no enrollment
    #[error("user {user_id} is not enrolled in course {course_id}")]
    NotEnrolled {
        /// User
        user_id: UserId,
        /// Course
        course_id: CourseId,
    },

    /// Second enrollment for the same pair
    #[error("user {user_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled {
        /// User
        user_id: UserId,
        /// Course
        course_id: CourseId,
    },

    /// The acting user's role does not permit the operation
    #[error("user {user_id} has role {actual}, but {required} is required")]
    InvalidRole {
        /// Acting user
        user_id: UserId,
        /// Role the operation needs
        required: Role,
        /// Role the user has
        actual: Role,
    },

    /// Unknown user or course
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Requested identifier
        id: String,
    },

    /// Rejected progress value or streak transition
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// Invalid engine configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    pub(crate) fn user_not_found(id: UserId) -> Self {
        EngineError::NotFound { entity: "user", id: id.to_string() }
    }

    pub(crate) fn course_not_found(id: CourseId) -> Self {
        EngineError::NotFound { entity: "course", id: id.to_string() }
    }
}
