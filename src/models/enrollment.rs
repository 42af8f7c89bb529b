//! Enrollment model
//!
//! An enrollment links one student to one course and optionally carries the
//! grade awarded for it. Marks and grade are stored together so neither can
//! exist without the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::grade::Grade;
use super::ids::{CourseCode, EnrollmentId, StudentId};
use crate::validation::{self, FieldError};

/// Marks recorded for an enrollment and the grade derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub marks: f64,
    pub grade: Grade,
    pub recorded_at: DateTime<Utc>,
}

impl GradeRecord {
    /// Build a record from raw marks, rejecting values outside [0, 100]
    pub fn from_marks(marks: f64) -> Result<Self, FieldError> {
        validation::validate_marks(marks)?;
        Ok(Self {
            marks,
            grade: Grade::from_marks(marks),
            recorded_at: Utc::now(),
        })
    }
}

/// A student's enrollment in a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_code: CourseCode,
    pub enrolled_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<GradeRecord>,
}

impl Enrollment {
    pub fn new(student_id: StudentId, course_code: CourseCode) -> Self {
        Self {
            id: EnrollmentId::new(),
            student_id,
            course_code,
            enrolled_at: Utc::now(),
            grade: None,
        }
    }

    /// Record marks, replacing any earlier grade
    pub fn record_grade(&mut self, marks: f64) -> Result<&GradeRecord, FieldError> {
        let record = GradeRecord::from_marks(marks)?;
        Ok(self.grade.insert(record))
    }

    pub fn has_grade(&self) -> bool {
        self.grade.is_some()
    }

    pub fn marks(&self) -> Option<f64> {
        self.grade.as_ref().map(|g| g.marks)
    }

    pub fn letter_grade(&self) -> Option<Grade> {
        self.grade.as_ref().map(|g| g.grade)
    }

    /// Whether this enrollment is for the given (student, course) pair
    pub fn matches(&self, student_id: &StudentId, course_code: &CourseCode) -> bool {
        &self.student_id == student_id && &self.course_code == course_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment() -> Enrollment {
        Enrollment::new(StudentId::new("S1001"), CourseCode::new("CS101"))
    }

    #[test]
    fn test_new_enrollment_has_no_grade() {
        let e = enrollment();
        assert!(!e.has_grade());
        assert_eq!(e.marks(), None);
        assert_eq!(e.letter_grade(), None);
    }

    #[test]
    fn test_record_grade_derives_letter() {
        let mut e = enrollment();
        let record = e.record_grade(85.0).unwrap();
        assert_eq!(record.grade, Grade::A);
        assert_eq!(e.marks(), Some(85.0));
        assert_eq!(e.letter_grade(), Some(Grade::A));
    }

    #[test]
    fn test_regrade_overwrites() {
        let mut e = enrollment();
        e.record_grade(55.0).unwrap();
        e.record_grade(91.0).unwrap();
        assert_eq!(e.letter_grade(), Some(Grade::S));
    }

    #[test]
    fn test_invalid_marks_leave_grade_untouched() {
        let mut e = enrollment();
        e.record_grade(70.0).unwrap();
        assert!(e.record_grade(101.0).is_err());
        assert!(e.record_grade(-1.0).is_err());
        assert_eq!(e.marks(), Some(70.0));
    }

    #[test]
    fn test_matches() {
        let e = enrollment();
        assert!(e.matches(&StudentId::new("S1001"), &CourseCode::new("CS101")));
        assert!(!e.matches(&StudentId::new("S1001"), &CourseCode::new("CS102")));
    }
}
