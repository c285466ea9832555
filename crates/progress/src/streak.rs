//! Daily-activity streak calculation.
//!
//! Streaks count calendar days, not 24-hour windows: activity at 23:59 and
//! again at 00:01 the next day extends the streak. The day boundary is taken
//! in a fixed UTC offset chosen by the deployment.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use eduquest_core::{ActivityState, Time};
use crate::error::{ProgressError, Result};

/// What an activity event did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First ever activity
    Started,
    /// Another activity on the same day
    Unchanged,
    /// First activity on the day after the last one
    Extended,
    /// First activity after one or more idle days
    Reset,
}

impl StreakChange {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakChange::Started => "started",
            StreakChange::Unchanged => "unchanged",
            StreakChange::Extended => "extended",
            StreakChange::Reset => "reset",
        }
    }
}

/// New activity state plus a description of what changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTransition {
    /// State to persist on the user record
    pub activity: ActivityState,

    /// Kind of change
    pub change: StreakChange,
}

impl StreakTransition {
    /// Whether the user record needs to be written.
    pub fn is_changed(&self) -> bool {
        self.change != StreakChange::Unchanged
    }
}

/// Computes streak transitions for activity events.
#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    offset: FixedOffset,
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl StreakCalculator {
    /// Calculator with day boundaries at UTC midnight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator with day boundaries at midnight in `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar day of `t` in this calculator's offset.
    pub fn day_of(&self, t: Time) -> NaiveDate {
        t.with_timezone(&self.offset).date_naive()
    }

    /// Record an activity event at `now`.
    ///
    /// Same-day events are no-ops, so calling this several times a day is safe.
    pub fn advance(&self, state: &ActivityState, now: Time) -> Result<StreakTransition> {
        let Some(last_activity) = state.last_activity else {
            return Ok(StreakTransition {
                activity: ActivityState {
                    current_streak: 1,
                    last_activity: Some(now),
                },
                change: StreakChange::Started,
            });
        };

        let gap = (self.day_of(now) - self.day_of(last_activity)).num_days();
        let (current_streak, change) = match gap {
            g if g < 0 => {
                return Err(ProgressError::ActivityInFuture { last_activity, now });
            }
            0 => {
                return Ok(StreakTransition {
                    activity: *state,
                    change: StreakChange::Unchanged,
                });
            }
            1 => (state.current_streak.saturating_add(1), StreakChange::Extended),
            _ => (1, StreakChange::Reset),
        };

        Ok(StreakTransition {
            activity: ActivityState {
                current_streak,
                last_activity: Some(now),
            },
            change,
        })
    }
}
