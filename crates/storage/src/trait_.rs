//! Storage trait abstraction.

use async_trait::async_trait;
use eduquest_core::{
    Achievement, AchievementType, Course, CourseId, Enrollment, User, UserId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for EduQuest records.
///
/// Backends must keep (user, course) unique for enrollments and
/// (user, kind) unique for achievements.
#[async_trait]
pub trait Storage: Send + Sync {
    // === User operations ===

    /// Save a user (create or update).
    async fn save_user(&mut self, user: &User) -> Result<()>;

    /// Load a user by ID.
    async fn load_user(&self, id: UserId) -> Result<Option<User>>;

    // === Course operations ===

    /// Save a course (create or update).
    async fn save_course(&mut self, course: &Course) -> Result<()>;

    /// Load a course by ID.
    async fn load_course(&self, id: CourseId) -> Result<Option<Course>>;

    /// List all courses.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// Add one to the course's enrolled count.
    ///
    /// Fails with [`StorageError::NotFound`] for an unknown course.
    async fn increment_enrolled(&mut self, id: CourseId) -> Result<()>;

    /// Subtract one from the course's enrolled count, flooring at zero.
    ///
    /// Fails with [`StorageError::NotFound`] for an unknown course.
    async fn decrement_enrolled(&mut self, id: CourseId) -> Result<()>;

    // === Enrollment operations ===

    /// Save an enrollment (create or update), keyed by (user, course).
    async fn save_enrollment(&mut self, enrollment: &Enrollment) -> Result<()>;

    /// Load the enrollment for a (user, course) pair.
    async fn load_enrollment(&self, user_id: UserId, course_id: CourseId)
        -> Result<Option<Enrollment>>;

    /// Delete the enrollment for a (user, course) pair. Missing is not an error.
    async fn delete_enrollment(&mut self, user_id: UserId, course_id: CourseId) -> Result<()>;

    /// List a user's enrollments.
    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>>;

    // === Achievement operations ===

    /// Insert an achievement unless the user already holds one of that kind.
    ///
    /// The check and the insert are a single atomic step. Returns the stored
    /// record: the new one, or the one that was already there.
    async fn insert_achievement(&mut self, achievement: &Achievement) -> Result<Achievement>;

    /// Find a user's achievement of the given kind.
    async fn find_achievement(&self, user_id: UserId, kind: AchievementType)
        -> Result<Option<Achievement>>;

    /// Count a user's achievements of the given kind.
    async fn count_achievements(&self, user_id: UserId, kind: AchievementType) -> Result<usize>;

    /// List a user's achievements, most recently earned first.
    async fn list_achievements(&self, user_id: UserId) -> Result<Vec<Achievement>>;
}
