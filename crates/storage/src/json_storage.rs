//! JSON file storage implementation.
//!
//! Stores each record as a pretty-printed JSON file under the storage root:
//!
//! ```text
//! users/<user>.json
//! courses/<course>.json
//! enrollments/<user>/<course>.json
//! achievements/<user>/<KIND>.json
//! ```
//!
//! Because an achievement's path is derived from (user, kind), the
//! filesystem itself enforces the one-per-kind rule.

use std::path::{Path, PathBuf};
use eduquest_core::{
    Achievement, AchievementType, Course, CourseId, Enrollment, User, UserId,
};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the top-level record directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("users")).await?;
        fs::create_dir_all(root.join("courses")).await?;
        fs::create_dir_all(root.join("enrollments")).await?;
        fs::create_dir_all(root.join("achievements")).await?;

        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_path(&self, id: UserId) -> PathBuf {
        self.root.join("users").join(format!("{}.json", id))
    }
    fn course_path(&self, id: CourseId) -> PathBuf {
        self.root.join("courses").join(format!("{}.json", id))
    }
    fn enrollment_dir(&self, user_id: UserId) -> PathBuf {
        self.root.join("enrollments").join(user_id.to_string())
    }
    fn enrollment_path(&self, user_id: UserId, course_id: CourseId) -> PathBuf {
        self.enrollment_dir(user_id).join(format!("{}.json", course_id))
    }
    fn achievement_dir(&self, user_id: UserId) -> PathBuf {
        self.root.join("achievements").join(user_id.to_string())
    }
    fn achievement_path(&self, user_id: UserId, kind: AchievementType) -> PathBuf {
        self.achievement_dir(user_id).join(format!("{}.json", kind.as_str()))
    }

    async fn update_course<F>(&mut self, id: CourseId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Course) + Send,
    {
        let mut course = self
            .load_course(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("course {}", id)))?;
        apply(&mut course);
        self.save_course(&course).await
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_user(&mut self, user: &User) -> Result<()> {
        write_json(&self.user_path(user.id), user).await
    }

    async fn load_user(&self, id: UserId) -> Result<Option<User>> {
        read_json(&self.user_path(id)).await
    }

    async fn save_course(&mut self, course: &Course) -> Result<()> {
        write_json(&self.course_path(course.id), course).await
    }

    async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        read_json(&self.course_path(id)).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        let mut courses = list_dir(&self.root.join("courses")).await?;
        courses.sort_by(|a: &Course, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn increment_enrolled(&mut self, id: CourseId) -> Result<()> {
        self.update_course(id, Course::increment_enrolled).await
    }

    async fn decrement_enrolled(&mut self, id: CourseId) -> Result<()> {
        self.update_course(id, Course::decrement_enrolled).await
    }

    async fn save_enrollment(&mut self, enrollment: &Enrollment) -> Result<()> {
        fs::create_dir_all(self.enrollment_dir(enrollment.user_id)).await?;
        write_json(
            &self.enrollment_path(enrollment.user_id, enrollment.course_id),
            enrollment,
        )
        .await
    }

    async fn load_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>> {
        read_json(&self.enrollment_path(user_id, course_id)).await
    }

    async fn delete_enrollment(&mut self, user_id: UserId, course_id: CourseId) -> Result<()> {
        fs::remove_file(self.enrollment_path(user_id, course_id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        Ok(())
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>> {
        list_dir(&self.enrollment_dir(user_id)).await
    }

    async fn insert_achievement(&mut self, achievement: &Achievement) -> Result<Achievement> {
        let dir = self.achievement_dir(achievement.user_id);
        fs::create_dir_all(&dir).await?;

        // Write the full record aside, then hard-link it into place. The link
        // fails if the (user, kind) file exists, so a reader never sees a
        // half-written achievement and only one writer can win.
        let path = self.achievement_path(achievement.user_id, achievement.kind);
        let staged = dir.join(format!(".{}.{}.tmp", achievement.kind.as_str(), achievement.id));
        fs::write(&staged, serde_json::to_string_pretty(achievement)?.as_bytes()).await?;

        let linked = fs::hard_link(&staged, &path).await;
        fs::remove_file(&staged).await?;

        match linked {
            Ok(()) => Ok(achievement.clone()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(user = %achievement.user_id, kind = %achievement.kind, "achievement already stored");
                read_json(&path).await?.ok_or_else(|| {
                    StorageError::NotFound(format!(
                        "achievement {} for user {}",
                        achievement.kind, achievement.user_id
                    ))
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_achievement(
        &self,
        user_id: UserId,
        kind: AchievementType,
    ) -> Result<Option<Achievement>> {
        read_json(&self.achievement_path(user_id, kind)).await
    }

    async fn count_achievements(&self, user_id: UserId, kind: AchievementType) -> Result<usize> {
        Ok(self.find_achievement(user_id, kind).await?.map_or(0, |_| 1))
    }

    async fn list_achievements(&self, user_id: UserId) -> Result<Vec<Achievement>> {
        let mut achievements = list_dir(&self.achievement_dir(user_id)).await?;
        achievements.sort_by(|a: &Achievement, b| b.earned_at.cmp(&a.earned_at));
        Ok(achievements)
    }
}

async fn write_json<T: serde::Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(items),
        Err(e) => return Err(e.into()),
    };
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Some(item) = read_json(&entry.path()).await? {
            items.push(item);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use eduquest_core::{Level, Role};

    fn test_course(instructor_id: UserId) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            title: "Intro to Rust".to_string(),
            description: "Ownership and borrowing".to_string(),
            category: "Programming".to_string(),
            level: Level::Beginner,
            instructor_id,
            duration_hours: Some(10),
            lessons: Some(12),
            students_enrolled: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_user_roundtrip_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let user = User::new("Ada", "ada@example.com", Role::Student);
        storage.save_user(&user).await.unwrap();

        assert_eq!(storage.load_user(user.id).await.unwrap(), Some(user));
        assert!(storage.load_user(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrolled_count_adjustments() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let course = test_course(UserId::new());
        storage.save_course(&course).await.unwrap();

        storage.increment_enrolled(course.id).await.unwrap();
        storage.increment_enrolled(course.id).await.unwrap();
        storage.decrement_enrolled(course.id).await.unwrap();
        storage.decrement_enrolled(course.id).await.unwrap();
        storage.decrement_enrolled(course.id).await.unwrap();

        let loaded = storage.load_course(course.id).await.unwrap().unwrap();
        assert_eq!(loaded.students_enrolled, 0);

        let missing = storage.increment_enrolled(CourseId::new()).await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_enrollment_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let user_id = UserId::new();
        assert!(storage.list_enrollments(user_id).await.unwrap().is_empty());

        let mut enrollment = Enrollment::new(user_id, CourseId::new(), Utc::now());
        storage.save_enrollment(&enrollment).await.unwrap();

        enrollment.set_progress(40, Utc::now());
        storage.save_enrollment(&enrollment).await.unwrap();

        let listed = storage.list_enrollments(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].progress, 40);

        storage.delete_enrollment(user_id, enrollment.course_id).await.unwrap();
        storage.delete_enrollment(user_id, enrollment.course_id).await.unwrap();
        assert!(storage
            .load_enrollment(user_id, enrollment.course_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_achievement_keeps_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let user_id = UserId::new();
        let first = Achievement::new(
            user_id,
            AchievementType::FirstCourse,
            "First Course",
            "first",
            Utc::now() - Duration::days(1),
        );
        let second = Achievement::new(
            user_id,
            AchievementType::FirstCourse,
            "First Course again",
            "second",
            Utc::now(),
        );

        let stored = storage.insert_achievement(&first).await.unwrap();
        let again = storage.insert_achievement(&second).await.unwrap();

        assert_eq!(stored, first);
        assert_eq!(again, first);
        assert_eq!(
            storage.count_achievements(user_id, AchievementType::FirstCourse).await.unwrap(),
            1
        );
        assert_eq!(storage.list_achievements(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_achievements_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let user_id = UserId::new();
        let now = Utc::now();
        for (kind, age) in [
            (AchievementType::CourseCompletion, 3),
            (AchievementType::Streak3Days, 1),
            (AchievementType::PerfectScore, 2),
        ] {
            let a = Achievement::new(user_id, kind, kind.as_str(), "", now - Duration::days(age));
            storage.insert_achievement(&a).await.unwrap();
        }

        let kinds: Vec<_> = storage
            .list_achievements(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                AchievementType::Streak3Days,
                AchievementType::PerfectScore,
                AchievementType::CourseCompletion,
            ]
        );
    }
}
