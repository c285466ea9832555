//! Achievement model - one-time awards.

use serde::{Deserialize, Serialize};
use crate::id::{AchievementId, UserId};
use crate::{ParseEnumError, Time};

/// An award earned by a user. At most one exists per (user, kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier
    pub id: AchievementId,

    /// Recipient
    pub user_id: UserId,

    /// Which award this is
    pub kind: AchievementType,

    /// Short headline
    pub title: String,

    /// Longer message shown to the user
    pub description: String,

    /// When earned; never changes afterwards
    pub earned_at: Time,
}

impl Achievement {
    /// Create a new achievement record earned at `now`.
    pub fn new(
        user_id: UserId,
        kind: AchievementType,
        title: impl Into<String>,
        description: impl Into<String>,
        now: Time,
    ) -> Self {
        Self {
            id: AchievementId::new(),
            user_id,
            kind,
            title: title.into(),
            description: description.into(),
            earned_at: now,
        }
    }
}

/// The fixed set of achievement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    /// Completed a course
    CourseCompletion,
    /// Active three days in a row
    #[serde(rename = "STREAK_3_DAYS")]
    Streak3Days,
    /// Active seven days in a row
    #[serde(rename = "STREAK_7_DAYS")]
    Streak7Days,
    /// Active thirty days in a row
    #[serde(rename = "STREAK_30_DAYS")]
    Streak30Days,
    /// First completed course
    FirstCourse,
    /// Reached 100% in a course
    PerfectScore,
    /// Completed a course in its first week
    EarlyBird,
    /// Completed several courses
    DedicatedLearner,
    /// Published a course
    CourseCreator,
    /// Teaches others
    Mentor,
}

impl AchievementType {
    /// Every kind, in declaration order.
    pub const ALL: [AchievementType; 10] = [
        AchievementType::CourseCompletion,
        AchievementType::Streak3Days,
        AchievementType::Streak7Days,
        AchievementType::Streak30Days,
        AchievementType::FirstCourse,
        AchievementType::PerfectScore,
        AchievementType::EarlyBird,
        AchievementType::DedicatedLearner,
        AchievementType::CourseCreator,
        AchievementType::Mentor,
    ];

    /// Stable storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::CourseCompletion => "COURSE_COMPLETION",
            AchievementType::Streak3Days => "STREAK_3_DAYS",
            AchievementType::Streak7Days => "STREAK_7_DAYS",
            AchievementType::Streak30Days => "STREAK_30_DAYS",
            AchievementType::FirstCourse => "FIRST_COURSE",
            AchievementType::PerfectScore => "PERFECT_SCORE",
            AchievementType::EarlyBird => "EARLY_BIRD",
            AchievementType::DedicatedLearner => "DEDICATED_LEARNER",
            AchievementType::CourseCreator => "COURSE_CREATOR",
            AchievementType::Mentor => "MENTOR",
        }
    }
}

impl std::fmt::Display for AchievementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AchievementType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("achievement type", s))
    }
}
