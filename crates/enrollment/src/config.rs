//! Engine configuration.

use chrono::{Duration, FixedOffset};
use eduquest_progress::{AchievementRules, ProgressTracker, StreakCalculator};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest accepted EARLY_BIRD window, about a century.
pub const MAX_EARLY_BIRD_WINDOW_DAYS: i64 = 36_500;

/// Tunables for the enrollment engine.
///
/// Missing fields in a config file fall back to [`EngineConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Offset of the day boundary used for streaks, in minutes east of UTC
    pub utc_offset_minutes: i32,
    /// A completion earns EARLY_BIRD when the course is younger than this
    pub early_bird_window_days: i64,
    /// Completed-course count that earns DEDICATED_LEARNER
    pub dedicated_learner_threshold: usize,
    /// Reject progress updates that lower the stored value
    pub forward_only_progress: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            early_bird_window_days: 7,
            dedicated_learner_threshold: 5,
            forward_only_progress: false,
        }
    }
}

impl EngineConfig {
    /// Day-boundary offset as a chrono offset.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                EngineError::Config(format!(
                    "utc_offset_minutes {} is outside (-1440, 1440)",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Check every field and build the streak calculator.
    pub fn streak_calculator(&self) -> Result<StreakCalculator> {
        Ok(StreakCalculator::with_offset(self.utc_offset()?))
    }

    /// Achievement rules with this config's thresholds.
    pub fn achievement_rules(&self) -> Result<AchievementRules> {
        let early_bird_window = Some(self.early_bird_window_days)
            .filter(|days| (0..=MAX_EARLY_BIRD_WINDOW_DAYS).contains(days))
            .and_then(Duration::try_days)
            .ok_or_else(|| {
                EngineError::Config(format!(
                    "early_bird_window_days {} is outside [0, {}]",
                    self.early_bird_window_days, MAX_EARLY_BIRD_WINDOW_DAYS
                ))
            })?;
        if self.dedicated_learner_threshold == 0 {
            return Err(EngineError::Config(
                "dedicated_learner_threshold must be at least 1".to_string(),
            ));
        }
        Ok(AchievementRules::new()
            .with_early_bird_window(early_bird_window)
            .with_dedicated_learner_threshold(self.dedicated_learner_threshold))
    }

    /// Progress tracker honoring `forward_only_progress`.
    pub fn progress_tracker(&self) -> ProgressTracker {
        ProgressTracker::new().forward_only(self.forward_only_progress)
    }
}
