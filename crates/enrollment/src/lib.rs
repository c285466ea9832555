//! Enrollment orchestration.
//!
//! Ties progress tracking, streaks and achievements together behind
//! [`EnrollmentManager`]. Every operation on one user's state runs under
//! that user's lock, so concurrent requests for the same learner are
//! applied one after another.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod grantor;
pub mod locks;
pub mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, MAX_EARLY_BIRD_WINDOW_DAYS};
pub use error::{EngineError, Result};
pub use grantor::AchievementGrantor;
pub use locks::UserLocks;
pub use manager::{BasicEnrollmentManager, CourseSpec, EnrollmentManager};

/// Storage handle shared by the manager and the grantor.
pub type SharedStorage<S> = std::sync::Arc<tokio::sync::Mutex<S>>;
