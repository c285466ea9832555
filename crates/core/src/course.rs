//! Course model.

use serde::{Deserialize, Serialize};
use crate::id::{CourseId, UserId};
use crate::{ParseEnumError, Time};

/// A course authored by an instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,

    /// Course title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Catalog category
    pub category: String,

    /// Difficulty level
    pub level: Level,

    /// Authoring instructor
    pub instructor_id: UserId,

    /// Expected effort in hours
    pub duration_hours: Option<u32>,

    /// Number of lessons
    pub lessons: Option<u32>,

    /// Current number of enrolled students
    pub students_enrolled: u32,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Course {
    /// Count one more enrolled student.
    pub fn increment_enrolled(&mut self) {
        self.students_enrolled = self.students_enrolled.saturating_add(1);
    }

    /// Count one fewer enrolled student, never dropping below zero.
    pub fn decrement_enrolled(&mut self) {
        self.students_enrolled = self.students_enrolled.saturating_sub(1);
    }
}

/// Course difficulty level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    /// No prior knowledge assumed
    #[default]
    Beginner,
    /// Builds on the basics
    Intermediate,
    /// For experienced learners
    Advanced,
}

impl std::str::FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(ParseEnumError::new("level", s)),
        }
    }
}
