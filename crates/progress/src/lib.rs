//! Progress Tracking
//!
//! Completion status, daily streaks, achievement rules and dashboard
//! statistics. Everything here except [`load_dashboard`] is pure: callers
//! receive new state and decide how to persist it.

#![warn(missing_docs)]

pub mod error;
pub mod tracker;
pub mod streak;
pub mod rules;
pub mod dashboard;

pub use error::{ProgressError, Result};
pub use tracker::{ProgressTracker, ProgressUpdate, apply_progress};
pub use streak::{StreakCalculator, StreakChange, StreakTransition};
pub use rules::{AchievementGrant, AchievementRules, CompletionContext, STREAK_THRESHOLDS};
pub use dashboard::{Dashboard, load_dashboard, RECENT_LIMIT};
