//! Student model
//!
//! A student is identified by a user-assigned ID and a registration number,
//! both immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{CourseCode, StudentId};
use crate::validation::{self, FieldError};

/// Enrollment status of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
    Suspended,
}

impl StudentStatus {
    /// Parse status from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "graduated" => Some(Self::Graduated),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    /// Whether a student in this status may enroll in courses
    pub fn can_enroll(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
            Self::Graduated => write!(f, "Graduated"),
            Self::Suspended => write!(f, "Suspended"),
        }
    }
}

/// A person's name, stored trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Self {
        Self {
            first: first.as_ref().trim().to_string(),
            last: last.as_ref().trim().to_string(),
        }
    }

    /// "First Last"
    pub fn full(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        validation::validate_required("First name", &self.first)?;
        validation::validate_required("Last name", &self.last)
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// A student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier (3-20 alphanumerics)
    pub id: StudentId,

    /// Unique registration number
    pub reg_no: String,

    pub name: PersonName,

    /// Contact email, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub status: StudentStatus,

    /// Codes of the courses the student currently holds an enrollment in
    #[serde(default)]
    pub enrolled_courses: BTreeSet<CourseCode>,

    /// When the student was registered with the institution
    pub registered_at: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Create a new active student with no enrollments
    pub fn new(id: impl Into<StudentId>, reg_no: impl AsRef<str>, name: PersonName) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            reg_no: reg_no.as_ref().trim().to_string(),
            name,
            email: None,
            status: StudentStatus::Active,
            enrolled_courses: BTreeSet::new(),
            registered_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style email setter; blank addresses are stored as `None`
    pub fn with_email(mut self, email: impl AsRef<str>) -> Self {
        self.set_email(email);
        self
    }

    pub fn set_email(&mut self, email: impl AsRef<str>) {
        let email = email.as_ref().trim();
        self.email = (!email.is_empty()).then(|| email.to_string());
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: StudentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// Record that the student now holds an enrollment in `code`
    pub fn add_course(&mut self, code: CourseCode) {
        self.enrolled_courses.insert(code);
        self.updated_at = Utc::now();
    }

    /// Forget the enrollment in `code`; returns whether it was present
    pub fn remove_course(&mut self, code: &CourseCode) -> bool {
        let removed = self.enrolled_courses.remove(code);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// "Full Name (REG-NO)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.reg_no)
    }

    /// Validate all fields
    pub fn validate(&self) -> Result<(), FieldError> {
        validation::validate_student_id(self.id.as_str())?;
        validation::validate_required("Registration number", &self.reg_no)?;
        self.name.validate()?;
        if let Some(email) = &self.email {
            validation::validate_email(email)?;
        }
        Ok(())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.id, self.name, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Student {
        Student::new("S1001", "REG-2024-001", PersonName::new("Ada", "Lovelace"))
    }

    #[test]
    fn test_new_student_is_active() {
        let student = ada();
        assert_eq!(student.id.as_str(), "S1001");
        assert!(student.is_active());
        assert!(student.enrolled_courses.is_empty());
        assert!(student.email.is_none());
    }

    #[test]
    fn test_blank_email_is_none() {
        let student = ada().with_email("   ");
        assert!(student.email.is_none());

        let student = ada().with_email(" ada@example.com ");
        assert_eq!(student.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_course_set() {
        let mut student = ada();
        student.add_course(CourseCode::new("CS101"));
        student.add_course(CourseCode::new("CS101"));
        assert_eq!(student.enrolled_courses.len(), 1);

        assert!(student.remove_course(&CourseCode::new("CS101")));
        assert!(!student.remove_course(&CourseCode::new("CS101")));
    }

    #[test]
    fn test_validation() {
        assert!(ada().validate().is_ok());

        let bad_id = Student::new("S1", "R1", PersonName::new("A", "B"));
        assert!(matches!(
            bad_id.validate(),
            Err(FieldError::InvalidStudentId(_))
        ));

        let no_last = Student::new("S1002", "R2", PersonName::new("Ada", " "));
        assert_eq!(no_last.validate(), Err(FieldError::Empty("Last name")));

        let bad_email = ada().with_email("not-an-email");
        assert!(matches!(bad_email.validate(), Err(FieldError::InvalidEmail(_))));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(StudentStatus::parse("GRADUATED"), Some(StudentStatus::Graduated));
        assert_eq!(StudentStatus::parse("unknown"), None);
        assert!(StudentStatus::Active.can_enroll());
        assert!(!StudentStatus::Suspended.can_enroll());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(ada().display_name(), "Ada Lovelace (REG-2024-001)");
    }
}
