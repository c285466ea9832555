//! Progress engine errors.

use eduquest_core::Time;

/// Error type for progress and streak transitions.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// A requested transition violates the progress or streak rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// Progress must be an integer percentage in [0, 100]
    #[error("invalid progress value {0}: must be between 0 and 100")]
    InvalidProgressValue(i64),

    /// Progress may not move backwards when the forward-only guard is on
    #[error("progress cannot go from {current} down to {requested}")]
    ProgressRegression {
        /// Stored progress
        current: u8,
        /// Requested progress
        requested: u8,
    },

    /// The recorded last activity is on a later calendar day than now
    #[error("last activity {last_activity} is after the current time {now}")]
    ActivityInFuture {
        /// Stored last activity
        last_activity: Time,
        /// Time of the new event
        now: Time,
    },
}
