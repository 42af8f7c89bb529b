//! Course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CourseCode;
use super::semester::Semester;
use crate::validation::{self, FieldError};

/// Credits assigned to a course when none are given
pub const DEFAULT_COURSE_CREDITS: u32 = 3;

/// A course offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code, e.g. "CS101"
    pub code: CourseCode,

    pub title: String,

    pub credits: u32,

    #[serde(default)]
    pub instructor: String,

    #[serde(default)]
    pub department: String,

    pub semester: Semester,

    /// Inactive courses accept no new enrollments
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a new active spring course with the default credit value
    pub fn new(code: impl Into<CourseCode>, title: impl AsRef<str>) -> Self {
        let now = Utc::now();
        Self {
            code: code.into(),
            title: title.as_ref().trim().to_string(),
            credits: DEFAULT_COURSE_CREDITS,
            instructor: String::new(),
            department: String::new(),
            semester: Semester::default(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn with_instructor(mut self, instructor: impl AsRef<str>) -> Self {
        self.instructor = instructor.as_ref().trim().to_string();
        self
    }

    pub fn with_department(mut self, department: impl AsRef<str>) -> Self {
        self.department = department.as_ref().trim().to_string();
        self
    }

    pub fn with_semester(mut self, semester: Semester) -> Self {
        self.semester = semester;
        self
    }

    /// Stop accepting enrollments
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate all fields; `max_credits` is the configured per-course ceiling
    pub fn validate(&self, max_credits: u32) -> Result<(), FieldError> {
        validation::validate_course_code(self.code.as_str())?;
        validation::validate_required("Course title", &self.title)?;
        validation::validate_credits(self.credits, max_credits)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} credits, {})",
            self.code, self.title, self.credits, self.semester
        )
    }
}
