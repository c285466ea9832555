//! User model - learners, instructors and their activity state.

use serde::{Deserialize, Serialize};
use crate::id::UserId;
use crate::{ParseEnumError, Time};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Platform role
    pub role: Role,

    /// Daily-activity streak state
    #[serde(default)]
    pub activity: ActivityState,

    /// When registered
    pub created_at: Time,
}

impl User {
    /// Create a new user with no recorded activity.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            role,
            activity: ActivityState::default(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Enrolls in courses and earns completion achievements
    Student,
    /// Authors courses
    Instructor,
    /// Platform administrator
    Admin,
}

impl Role {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Instructor => "INSTRUCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// Daily-activity state owned by the user record.
///
/// Only streak transitions produce a new value; everything else reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    /// Consecutive calendar days with at least one activity
    pub current_streak: u32,

    /// Instant of the most recent counted activity
    pub last_activity: Option<Time>,
}
