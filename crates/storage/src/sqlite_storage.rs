//! SQLite storage backend for EduQuest.
//!
//! Records are stored as JSON documents next to the key columns the engine
//! queries by. The schema keeps one row per (user, course) enrollment and
//! one row per (user, kind) achievement. Achievement inserts never replace an
//! existing row, even across processes. Enrollment saves are upserts, so
//! duplicate enrollment detection relies on the caller serializing per user.

use async_trait::async_trait;
use chrono::SecondsFormat;
use eduquest_core::{
    Achievement, AchievementType, Course, CourseId, Enrollment, Time, User, UserId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

use super::trait_::{Storage, StorageError, Result};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

fn db_err(e: sqlx::Error) -> StorageError {
    StorageError::Other(e.to_string())
}

fn timestamp(t: &Time) -> String {
    // Fixed width so that text ordering matches time ordering.
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SqliteStorage {
    /// Open (or create) a database at the given `sqlite:` URL.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Create an in-memory SQLite storage for testing.
    pub async fn in_memory() -> Result<Self> {
        // Every pooled connection to :memory: would see its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS courses (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS enrollments (
                user_id TEXT NOT NULL,
                course_id TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, course_id)
            )",
            "CREATE TABLE IF NOT EXISTS achievements (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                data TEXT NOT NULL,
                earned_at TEXT NOT NULL,
                UNIQUE (user_id, kind)
            )",
        ];

        for sql in statements {
            sqlx::query(sql).execute(&self.pool).await.map_err(db_err)?;
        }

        Ok(())
    }

    async fn fetch_one_data<'q, T: serde::de::DeserializeOwned>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> Result<Option<T>> {
        match query.fetch_optional(&self.pool).await.map_err(db_err)? {
            Some(row) => {
                let data: String = row.try_get("data").map_err(db_err)?;
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn fetch_all_data<'q, T: serde::de::DeserializeOwned>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> Result<Vec<T>> {
        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        rows.into_iter()
            .map(|row| {
                let data: String = row.try_get("data").map_err(db_err)?;
                Ok(serde_json::from_str(&data)?)
            })
            .collect()
    }

    async fn adjust_enrolled(&self, id: CourseId, sql: &str) -> Result<()> {
        let result = sqlx::query(sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("course {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // === User operations ===

    async fn save_user(&mut self, user: &User) -> Result<()> {
        let data = serde_json::to_string(user)?;
        sqlx::query("INSERT OR REPLACE INTO users (id, data) VALUES (?, ?)")
            .bind(user.id.to_string())
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn load_user(&self, id: UserId) -> Result<Option<User>> {
        self.fetch_one_data(sqlx::query("SELECT data FROM users WHERE id = ?").bind(id.to_string()))
            .await
    }

    // === Course operations ===

    async fn save_course(&mut self, course: &Course) -> Result<()> {
        let data = serde_json::to_string(course)?;
        sqlx::query("INSERT OR REPLACE INTO courses (id, data, created_at) VALUES (?, ?, ?)")
            .bind(course.id.to_string())
            .bind(data)
            .bind(timestamp(&course.created_at))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        self.fetch_one_data(sqlx::query("SELECT data FROM courses WHERE id = ?").bind(id.to_string()))
            .await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.fetch_all_data(sqlx::query("SELECT data FROM courses ORDER BY created_at DESC"))
            .await
    }

    async fn increment_enrolled(&mut self, id: CourseId) -> Result<()> {
        self.adjust_enrolled(
            id,
            "UPDATE courses
             SET data = json_set(data, '$.students_enrolled',
                                 json_extract(data, '$.students_enrolled') + 1)
             WHERE id = ?",
        )
        .await
    }

    async fn decrement_enrolled(&mut self, id: CourseId) -> Result<()> {
        self.adjust_enrolled(
            id,
            "UPDATE courses
             SET data = json_set(data, '$.students_enrolled',
                                 max(json_extract(data, '$.students_enrolled') - 1, 0))
             WHERE id = ?",
        )
        .await
    }

    // === Enrollment operations ===

    async fn save_enrollment(&mut self, enrollment: &Enrollment) -> Result<()> {
        let data = serde_json::to_string(enrollment)?;
        sqlx::query(
            "INSERT INTO enrollments (user_id, course_id, data) VALUES (?, ?, ?)
             ON CONFLICT (user_id, course_id) DO UPDATE SET data = excluded.data",
        )
        .bind(enrollment.user_id.to_string())
        .bind(enrollment.course_id.to_string())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn load_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>> {
        self.fetch_one_data(
            sqlx::query("SELECT data FROM enrollments WHERE user_id = ? AND course_id = ?")
                .bind(user_id.to_string())
                .bind(course_id.to_string()),
        )
        .await
    }

    async fn delete_enrollment(&mut self, user_id: UserId, course_id: CourseId) -> Result<()> {
        sqlx::query("DELETE FROM enrollments WHERE user_id = ? AND course_id = ?")
            .bind(user_id.to_string())
            .bind(course_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>> {
        self.fetch_all_data(
            sqlx::query("SELECT data FROM enrollments WHERE user_id = ?").bind(user_id.to_string()),
        )
        .await
    }

    // === Achievement operations ===

    async fn insert_achievement(&mut self, achievement: &Achievement) -> Result<Achievement> {
        let data = serde_json::to_string(achievement)?;
        let inserted = sqlx::query(
            "INSERT INTO achievements (id, user_id, kind, data, earned_at) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id, kind) DO NOTHING",
        )
        .bind(achievement.id.to_string())
        .bind(achievement.user_id.to_string())
        .bind(achievement.kind.as_str())
        .bind(data)
        .bind(timestamp(&achievement.earned_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?
        .rows_affected();

        if inserted == 0 {
            debug!(user = %achievement.user_id, kind = %achievement.kind, "achievement already stored");
        }

        self.find_achievement(achievement.user_id, achievement.kind)
            .await?
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "achievement {} for user {}",
                    achievement.kind, achievement.user_id
                ))
            })
    }

    async fn find_achievement(
        &self,
        user_id: UserId,
        kind: AchievementType,
    ) -> Result<Option<Achievement>> {
        self.fetch_one_data(
            sqlx::query("SELECT data FROM achievements WHERE user_id = ? AND kind = ?")
                .bind(user_id.to_string())
                .bind(kind.as_str()),
        )
        .await
    }

    async fn count_achievements(&self, user_id: UserId, kind: AchievementType) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM achievements WHERE user_id = ? AND kind = ?",
        )
        .bind(user_id.to_string())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(count as usize)
    }

    async fn list_achievements(&self, user_id: UserId) -> Result<Vec<Achievement>> {
        self.fetch_all_data(
            sqlx::query("SELECT data FROM achievements WHERE user_id = ? ORDER BY earned_at DESC")
                .bind(user_id.to_string()),
        )
        .await
    }
}
