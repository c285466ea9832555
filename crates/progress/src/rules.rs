//! Achievement rules.
//!
//! Each rule is a pure predicate over the state after an event and yields
//! zero or one grant request. Granting is idempotent downstream, so rules
//! do not need to know whether an award is already held.

use chrono::Duration;
use eduquest_core::{Achievement, AchievementType, Course, Role, Time, UserId};

/// Streak lengths that earn an award.
pub const STREAK_THRESHOLDS: [(u32, AchievementType); 3] = [
    (3, AchievementType::Streak3Days),
    (7, AchievementType::Streak7Days),
    (30, AchievementType::Streak30Days),
];

/// A request to grant one achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementGrant {
    /// Kind to grant
    pub kind: AchievementType,
    /// Headline
    pub title: String,
    /// Message
    pub description: String,
}

impl AchievementGrant {
    fn new(kind: AchievementType, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Build the record to store for `user_id`.
    pub fn into_achievement(self, user_id: UserId, now: Time) -> Achievement {
        Achievement::new(user_id, self.kind, self.title, self.description, now)
    }
}

/// State visible to completion rules.
#[derive(Debug, Clone, Copy)]
pub struct CompletionContext<'a> {
    /// Course that was just completed
    pub course: &'a Course,
    /// Number of the user's enrollments now completed, this one included
    pub completed_courses: usize,
    /// Time of the completing update
    pub now: Time,
}

/// Tunable achievement rule set.
#[derive(Debug, Clone)]
pub struct AchievementRules {
    early_bird_window: Duration,
    dedicated_learner_threshold: usize,
}

impl Default for AchievementRules {
    fn default() -> Self {
        Self {
            early_bird_window: Duration::days(7),
            dedicated_learner_threshold: 5,
        }
    }
}

impl AchievementRules {
    /// Rules with the standard thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// How recently a course must have been created for EARLY_BIRD.
    pub fn with_early_bird_window(mut self, window: Duration) -> Self {
        self.early_bird_window = window;
        self
    }

    /// Completed-course count that earns DEDICATED_LEARNER.
    pub fn with_dedicated_learner_threshold(mut self, threshold: usize) -> Self {
        self.dedicated_learner_threshold = threshold;
        self
    }

    /// Grants for reaching a streak, lowest threshold first.
    pub fn streak_grants(&self, streak: u32) -> Vec<AchievementGrant> {
        STREAK_THRESHOLDS
            .iter()
            .filter(|(days, _)| streak >= *days)
            .map(|(days, kind)| {
                AchievementGrant::new(
                    *kind,
                    format!("{}-Day Streak", days),
                    format!("You have kept learning {} days in a row.", days),
                )
            })
            .collect()
    }

    /// Grants for a course reaching 100%, in evaluation order.
    pub fn completion_grants(&self, ctx: &CompletionContext<'_>) -> Vec<AchievementGrant> {
        let title = &ctx.course.title;
        let mut grants = vec![AchievementGrant::new(
            AchievementType::CourseCompletion,
            format!("Course Completed: {}", title),
            format!("You completed {}.", title),
        )];

        if ctx.completed_courses == 1 {
            grants.push(AchievementGrant::new(
                AchievementType::FirstCourse,
                "First Course Completed",
                "You finished your first course.",
            ));
        }

        // Every completion counts as a perfect score; there is no graded score yet.
        grants.push(AchievementGrant::new(
            AchievementType::PerfectScore,
            format!("Perfect Score: {}", title),
            format!("You reached 100% in {}.", title),
        ));

        // A window reaching past the earliest representable time covers everything.
        let recent = ctx
            .now
            .checked_sub_signed(self.early_bird_window)
            .map_or(true, |cutoff| ctx.course.created_at > cutoff);
        if recent {
            grants.push(AchievementGrant::new(
                AchievementType::EarlyBird,
                format!("Early Bird: {}", title),
                "You finished a course in its first week.",
            ));
        }

        if ctx.completed_courses >= self.dedicated_learner_threshold {
            grants.push(AchievementGrant::new(
                AchievementType::DedicatedLearner,
                "Dedicated Learner",
                format!("You have completed {} courses.", ctx.completed_courses),
            ));
        }

        grants
    }

    /// Grants for publishing a course.
    pub fn course_created_grants(&self, role: Role) -> Vec<AchievementGrant> {
        if role != Role::Instructor {
            return Vec::new();
        }
        vec![
            AchievementGrant::new(
                AchievementType::CourseCreator,
                "Course Creator",
                "You published a course for others to learn from.",
            ),
            AchievementGrant::new(
                AchievementType::Mentor,
                "Mentor",
                "You are helping others learn through your teaching.",
            ),
        ]
    }
}
