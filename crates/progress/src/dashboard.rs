//! Per-user dashboard statistics.

use std::collections::HashMap;
use eduquest_core::{
    Achievement, CompletionStatus, Course, CourseId, Enrollment, Time, User, UserId,
};
use eduquest_storage::Storage;
use serde::Serialize;

/// How many recent enrollments and achievements a dashboard shows.
pub const RECENT_LIMIT: usize = 5;

/// Aggregated learning statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Owner
    pub user_id: UserId,
    /// Owner's display name
    pub user_name: String,
    /// Courses currently enrolled in
    pub total_enrolled_courses: usize,
    /// Enrollments at 100%
    pub completed_courses: usize,
    /// Enrollments between 1% and 99%
    pub in_progress_courses: usize,
    /// Sum of durations of completed courses
    pub total_hours: u32,
    /// Current daily streak
    pub current_streak: u32,
    /// Achievements held
    pub total_achievements: usize,
    /// Newest enrollments first
    pub recent_enrollments: Vec<Enrollment>,
    /// Newest achievements first
    pub recent_achievements: Vec<Achievement>,
    /// Last counted activity
    pub last_activity: Option<Time>,
}

impl Dashboard {
    /// Aggregate already-loaded records.
    ///
    /// Courses missing from `courses` contribute no hours.
    pub fn build(
        user: &User,
        mut enrollments: Vec<Enrollment>,
        courses: &HashMap<CourseId, Course>,
        mut achievements: Vec<Achievement>,
    ) -> Self {
        let count = |status: CompletionStatus| enrollments.iter().filter(|e| e.status == status).count();
        let completed_courses = count(CompletionStatus::Completed);
        let in_progress_courses = count(CompletionStatus::InProgress);

        let total_hours = enrollments
            .iter()
            .filter(|e| e.is_completed())
            .filter_map(|e| courses.get(&e.course_id).and_then(|c| c.duration_hours))
            .fold(0u32, u32::saturating_add);

        let total_enrolled_courses = enrollments.len();
        let total_achievements = achievements.len();

        enrollments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        enrollments.truncate(RECENT_LIMIT);
        achievements.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));
        achievements.truncate(RECENT_LIMIT);

        Self {
            user_id: user.id,
            user_name: user.name.clone(),
            total_enrolled_courses,
            completed_courses,
            in_progress_courses,
            total_hours,
            current_streak: user.activity.current_streak,
            total_achievements,
            recent_enrollments: enrollments,
            recent_achievements: achievements,
            last_activity: user.activity.last_activity,
        }
    }
}

/// Load everything a dashboard needs from storage.
///
/// Returns `None` for an unknown user.
pub async fn load_dashboard<S: Storage + ?Sized>(
    storage: &S,
    user_id: UserId,
) -> eduquest_storage::Result<Option<Dashboard>> {
    let Some(user) = storage.load_user(user_id).await? else {
        return Ok(None);
    };

    let enrollments = storage.list_enrollments(user_id).await?;
    let mut courses = HashMap::new();
    for enrollment in &enrollments {
        if let Some(course) = storage.load_course(enrollment.course_id).await? {
            courses.insert(course.id, course);
        }
    }
    let achievements = storage.list_achievements(user_id).await?;

    Ok(Some(Dashboard::build(&user, enrollments, &courses, achievements)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use eduquest_core::{AchievementType, Level, Role};
    use eduquest_storage::JsonStorage;

    fn course(hours: Option<u32>) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            title: "Course".to_string(),
            description: String::new(),
            category: "General".to_string(),
            level: Level::Beginner,
            instructor_id: UserId::new(),
            duration_hours: hours,
            lessons: None,
            students_enrolled: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_build_counts_and_hours() {
        let user = User::new("Lin", "lin@example.com", Role::Student);
        let now = Utc::now();

        let done = course(Some(10));
        let done_no_hours = course(None);
        let started = course(Some(40));
        let courses: HashMap<_, _> = [&done, &done_no_hours, &started]
            .into_iter()
            .map(|c| (c.id, c.clone()))
            .collect();

        let mut a = Enrollment::new(user.id, done.id, now);
        a.set_progress(100, now);
        let mut b = Enrollment::new(user.id, done_no_hours.id, now);
        b.set_progress(100, now);
        let mut c = Enrollment::new(user.id, started.id, now);
        c.set_progress(30, now);

        let dashboard = Dashboard::build(&user, vec![a, b, c], &courses, Vec::new());
        assert_eq!(dashboard.total_enrolled_courses, 3);
        assert_eq!(dashboard.completed_courses, 2);
        assert_eq!(dashboard.in_progress_courses, 1);
        assert_eq!(dashboard.total_hours, 10);
        assert_eq!(dashboard.total_achievements, 0);
    }

    #[test]
    fn test_total_hours_saturates() {
        let user = User::new("Lin", "lin@example.com", Role::Student);
        let now = Utc::now();

        let long = [course(Some(u32::MAX)), course(Some(u32::MAX - 1))];
        let courses: HashMap<_, _> = long.iter().map(|c| (c.id, c.clone())).collect();
        let enrollments = long
            .iter()
            .map(|c| {
                let mut e = Enrollment::new(user.id, c.id, now);
                e.set_progress(100, now);
                e
            })
            .collect();

        let dashboard = Dashboard::build(&user, enrollments, &courses, Vec::new());
        assert_eq!(dashboard.total_hours, u32::MAX);
    }

    #[test]
    fn test_build_keeps_five_newest() {
        let user = User::new("Lin", "lin@example.com", Role::Student);
        let now = Utc::now();

        let enrollments: Vec<_> = (0..7)
            .map(|i| Enrollment::new(user.id, CourseId::new(), now - Duration::days(i)))
            .collect();
        let newest = enrollments[0].id;
        let achievements: Vec<_> = AchievementType::ALL
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Achievement::new(user.id, kind, "", "", now - Duration::hours(i as i64)))
            .collect();

        let dashboard = Dashboard::build(&user, enrollments, &HashMap::new(), achievements);
        assert_eq!(dashboard.total_enrolled_courses, 7);
        assert_eq!(dashboard.recent_enrollments.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent_enrollments[0].id, newest);
        assert_eq!(dashboard.total_achievements, AchievementType::ALL.len());
        assert_eq!(dashboard.recent_achievements.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent_achievements[0].kind, AchievementType::CourseCompletion);
    }

    #[tokio::test]
    async fn test_load_dashboard_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(load_dashboard(&storage, UserId::new()).await.unwrap().is_none());
    }
}
