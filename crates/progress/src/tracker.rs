//! Progress tracking: percentage to completion status.

use eduquest_core::{CompletionStatus, COMPLETE_PROGRESS};
use crate::error::{ProgressError, Result};

/// Outcome of applying a progress value to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// New progress value
    pub progress: u8,

    /// Status derived from `progress`
    pub status: CompletionStatus,

    /// True only on the edge into 100 from a lower value
    pub just_completed: bool,
}

/// Converts raw progress submissions into validated updates.
///
/// Pure: the caller persists the returned progress/status pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressTracker {
    forward_only: bool,
}

impl ProgressTracker {
    /// Create a tracker that accepts any value in [0, 100].
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject updates that lower progress.
    pub fn forward_only(mut self, forward_only: bool) -> Self {
        self.forward_only = forward_only;
        self
    }

    /// Apply `new_value` on top of `current`.
    pub fn apply(&self, current: u8, new_value: i64) -> Result<ProgressUpdate> {
        let progress = u8::try_from(new_value)
            .ok()
            .filter(|p| *p <= COMPLETE_PROGRESS)
            .ok_or(ProgressError::InvalidProgressValue(new_value))?;

        if self.forward_only && progress < current {
            return Err(ProgressError::ProgressRegression {
                current,
                requested: progress,
            });
        }

        Ok(ProgressUpdate {
            progress,
            status: CompletionStatus::from_progress(progress),
            just_completed: progress == COMPLETE_PROGRESS && current != COMPLETE_PROGRESS,
        })
    }
}

/// Apply a progress value with the default (non forward-only) rules.
pub fn apply_progress(current: u8, new_value: i64) -> Result<ProgressUpdate> {
    ProgressTracker::new().apply(current, new_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation_over_full_range() {
        for p in 0..=100i64 {
            let update = apply_progress(0, p).unwrap();
            assert_eq!(update.progress as i64, p);
            assert_eq!(update.status == CompletionStatus::NotStarted, p == 0);
            assert_eq!(update.status == CompletionStatus::Completed, p == 100);
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert_eq!(
            apply_progress(10, 101),
            Err(ProgressError::InvalidProgressValue(101))
        );
        assert_eq!(
            apply_progress(10, -1),
            Err(ProgressError::InvalidProgressValue(-1))
        );
        assert_eq!(
            apply_progress(10, 300),
            Err(ProgressError::InvalidProgressValue(300))
        );
    }

    #[test]
    fn test_just_completed_only_on_edge() {
        assert!(apply_progress(99, 100).unwrap().just_completed);
        assert!(apply_progress(0, 100).unwrap().just_completed);
        assert!(!apply_progress(100, 100).unwrap().just_completed);
        assert!(!apply_progress(50, 99).unwrap().just_completed);
    }

    #[test]
    fn test_downward_progress_allowed_by_default() {
        let update = apply_progress(100, 50).unwrap();
        assert_eq!(update.status, CompletionStatus::InProgress);
        assert!(!update.just_completed);
    }

    #[test]
    fn test_forward_only_guard() {
        let tracker = ProgressTracker::new().forward_only(true);
        assert_eq!(
            tracker.apply(60, 40),
            Err(ProgressError::ProgressRegression { current: 60, requested: 40 })
        );
        assert!(tracker.apply(60, 60).is_ok());
        assert!(tracker.apply(60, 100).unwrap().just_completed);
    }
}
