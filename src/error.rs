//! Custom error types for Registrar
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Registrar operations
#[derive(Error, Debug)]
pub enum RegistrarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The student already holds an enrollment in the course
    #[error("Student '{student}' is already enrolled in course '{course}'")]
    DuplicateEnrollment { student: String, course: String },

    /// Enrolling would push the student over the per-semester credit cap
    #[error(
        "Enrolling '{student}' in '{course}' would exceed the {semester} credit limit: \
         {current} enrolled + {requested} requested > {limit}"
    )]
    CreditLimitExceeded {
        student: String,
        course: String,
        semester: String,
        current: u32,
        requested: u32,
        limit: u32,
    },

    /// Student or course is not in a state that allows enrollment
    #[error("Not eligible: {0}")]
    Ineligible(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Backup and restore errors
    #[error("Backup error: {0}")]
    Backup(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RegistrarError {
    /// Create a "not found" error for students
    pub fn student_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Student",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for courses
    pub fn course_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Course",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a (student, course) enrollment
    pub fn enrollment_not_found(student: impl AsRef<str>, course: impl AsRef<str>) -> Self {
        Self::NotFound {
            entity_type: "Enrollment",
            identifier: format!("{} in {}", student.as_ref(), course.as_ref()),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a duplicate entity or duplicate enrollment error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. } | Self::DuplicateEnrollment { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for RegistrarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for RegistrarError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Registrar operations
pub type RegistrarResult<T> = Result<T, RegistrarError>;
