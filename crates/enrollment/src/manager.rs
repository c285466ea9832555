//! Enrollment orchestration.

use std::sync::Arc;

use async_trait::async_trait;
use eduquest_core::{Course, CourseId, Enrollment, Level, Role, User, UserId};
use eduquest_progress::{
    load_dashboard, AchievementRules, CompletionContext, Dashboard, ProgressTracker,
    StreakCalculator, StreakTransition,
};
use eduquest_storage::Storage;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::grantor::AchievementGrantor;
use crate::locks::UserLocks;
use crate::SharedStorage;

/// Enrollment service.
#[async_trait]
pub trait EnrollmentManager: Send + Sync {
    /// Enroll a student in a course.
    async fn enroll(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment>;

    /// Record a new progress percentage for an enrollment.
    async fn update_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        progress: i64,
    ) -> Result<Enrollment>;

    /// Remove an enrollment. Earned achievements are kept.
    async fn unenroll(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment>;

    /// Publish a course authored by an instructor.
    async fn create_course(&self, instructor_id: UserId, spec: CourseSpec) -> Result<Course>;

    /// Aggregated statistics for a user.
    async fn dashboard(&self, user_id: UserId) -> Result<Dashboard>;
}

/// Specification for creating a course.
#[derive(Debug, Clone, Default)]
pub struct CourseSpec {
    /// Course title
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Catalog category
    pub category: String,
    /// Difficulty level
    pub level: Level,
    /// Expected effort in hours
    pub duration_hours: Option<u32>,
    /// Number of lessons
    pub lessons: Option<u32>,
}

/// Enrollment manager over a single storage backend.
pub struct BasicEnrollmentManager<S: Storage> {
    storage: SharedStorage<S>,
    grantor: AchievementGrantor<S>,
    locks: UserLocks,
    clock: Arc<dyn Clock>,
    tracker: ProgressTracker,
    streaks: StreakCalculator,
    rules: AchievementRules,
}

impl<S: Storage> BasicEnrollmentManager<S> {
    /// Create a manager with the default configuration and the wall clock.
    pub fn new(storage: S) -> Self {
        let storage = Arc::new(tokio::sync::Mutex::new(storage));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            grantor: AchievementGrantor::new(Arc::clone(&storage), Arc::clone(&clock)),
            storage,
            locks: UserLocks::new(),
            clock,
            tracker: ProgressTracker::new(),
            streaks: StreakCalculator::new(),
            rules: AchievementRules::new(),
        }
    }

    /// Apply engine configuration.
    pub fn with_config(mut self, config: &EngineConfig) -> Result<Self> {
        self.tracker = config.progress_tracker();
        self.streaks = config.streak_calculator()?;
        self.rules = config.achievement_rules()?;
        Ok(self)
    }

    /// Set time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.grantor = AchievementGrantor::new(Arc::clone(&self.storage), Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// Shared storage handle.
    pub fn storage(&self) -> SharedStorage<S> {
        Arc::clone(&self.storage)
    }

    async fn load_user(&self, user_id: UserId) -> Result<User> {
        self.storage
            .lock()
            .await
            .load_user(user_id)
            .await?
            .ok_or_else(|| EngineError::user_not_found(user_id))
    }

    async fn load_course(&self, course_id: CourseId) -> Result<Course> {
        self.storage
            .lock()
            .await
            .load_course(course_id)
            .await?
            .ok_or_else(|| EngineError::course_not_found(course_id))
    }

    async fn load_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        self.storage
            .lock()
            .await
            .load_enrollment(user_id, course_id)
            .await?
            .ok_or(EngineError::NotEnrolled { user_id, course_id })
    }

    /// Persist a streak transition and grant any streak awards it reaches.
    ///
    /// Streak rules run even when the day did not change; grants are
    /// idempotent.
    async fn record_activity(&self, user: &mut User, transition: StreakTransition) -> Result<()> {
        if transition.is_changed() {
            user.activity = transition.activity;
            self.storage.lock().await.save_user(user).await?;
            info!(
                user_id = %user.id,
                streak = user.activity.current_streak,
                change = transition.change.as_str(),
                "Streak updated"
            );
        } else {
            debug!(user_id = %user.id, "Activity on an already counted day");
        }

        let grants = self.rules.streak_grants(user.activity.current_streak);
        self.grantor.grant_all(user.id, grants).await?;
        Ok(())
    }

    async fn completed_course_count(&self, user_id: UserId) -> Result<usize> {
        let enrollments = self.storage.lock().await.list_enrollments(user_id).await?;
        Ok(enrollments.iter().filter(|e| e.is_completed()).count())
    }
}

#[async_trait]
impl<S: Storage + 'static> EnrollmentManager for BasicEnrollmentManager<S> {
    async fn enroll(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let _guard = self.locks.acquire(user_id).await;
        let now = self.clock.now();

        let mut user = self.load_user(user_id).await?;
        if user.role != Role::Student {
            warn!(user_id = %user_id, role = %user.role, "Enrollment refused");
            return Err(EngineError::InvalidRole {
                user_id,
                required: Role::Student,
                actual: user.role,
            });
        }
        let course = self.load_course(course_id).await?;

        if self
            .storage
            .lock()
            .await
            .load_enrollment(user_id, course_id)
            .await?
            .is_some()
        {
            return Err(EngineError::AlreadyEnrolled { user_id, course_id });
        }

        let transition = self.streaks.advance(&user.activity, now)?;
        let enrollment = Enrollment::new(user_id, course.id, now);
        {
            let mut storage = self.storage.lock().await;
            storage.increment_enrolled(course.id).await?;
            if let Err(e) = storage.save_enrollment(&enrollment).await {
                warn!(user_id = %user_id, course_id = %course_id, "Enrollment write failed: {}", e);
                storage.decrement_enrolled(course.id).await?;
                return Err(e.into());
            }
        }
        info!(user_id = %user_id, course_id = %course_id, "Enrolled");

        self.record_activity(&mut user, transition).await?;
        Ok(enrollment)
    }

    async fn update_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        progress: i64,
    ) -> Result<Enrollment> {
        let _guard = self.locks.acquire(user_id).await;
        let now = self.clock.now();

        let mut user = self.load_user(user_id).await?;
        let course = self.load_course(course_id).await?;
        let mut enrollment = self.load_enrollment(user_id, course_id).await?;

        let update = self
            .tracker
            .apply(enrollment.progress, progress)
            .inspect_err(|e| warn!(user_id = %user_id, course_id = %course_id, "{}", e))?;
        let transition = self.streaks.advance(&user.activity, now)?;

        enrollment.set_progress(update.progress, now);
        self.storage.lock().await.save_enrollment(&enrollment).await?;
        debug!(
            user_id = %user_id,
            course_id = %course_id,
            progress = update.progress,
            status = %update.status,
            "Progress saved"
        );

        self.record_activity(&mut user, transition).await?;

        if update.just_completed {
            info!(user_id = %user_id, course_id = %course_id, "Course completed");
            let completed_courses = self.completed_course_count(user_id).await?;
            let grants = self.rules.completion_grants(&CompletionContext {
                course: &course,
                completed_courses,
                now,
            });
            self.grantor.grant_all(user_id, grants).await?;
        }

        Ok(enrollment)
    }

    async fn unenroll(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let _guard = self.locks.acquire(user_id).await;

        self.load_user(user_id).await?;
        let course = self.load_course(course_id).await?;
        let enrollment = self.load_enrollment(user_id, course_id).await?;
        {
            let mut storage = self.storage.lock().await;
            storage.delete_enrollment(user_id, course.id).await?;
            storage.decrement_enrolled(course.id).await?;
        }
        info!(user_id = %user_id, course_id = %course_id, "Unenrolled");

        Ok(enrollment)
    }

    async fn create_course(&self, instructor_id: UserId, spec: CourseSpec) -> Result<Course> {
        let instructor = self.load_user(instructor_id).await?;
        if instructor.role != Role::Instructor {
            warn!(user_id = %instructor_id, role = %instructor.role, "Course creation refused");
            return Err(EngineError::InvalidRole {
                user_id: instructor_id,
                required: Role::Instructor,
                actual: instructor.role,
            });
        }

        let now = self.clock.now();
        let course = Course {
            id: CourseId::new(),
            title: spec.title,
            description: spec.description,
            category: spec.category,
            level: spec.level,
            instructor_id,
            duration_hours: spec.duration_hours,
            lessons: spec.lessons,
            students_enrolled: 0,
            created_at: now,
            updated_at: now,
        };
        self.storage.lock().await.save_course(&course).await?;
        info!(course_id = %course.id, instructor_id = %instructor_id, "Course created");

        let grants = self.rules.course_created_grants(instructor.role);
        self.grantor.grant_all(instructor_id, grants).await?;
        Ok(course)
    }

    async fn dashboard(&self, user_id: UserId) -> Result<Dashboard> {
        let storage = self.storage.lock().await;
        load_dashboard(&*storage, user_id)
            .await?
            .ok_or_else(|| EngineError::user_not_found(user_id))
    }
}
