//! Enrollment display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Enrollment;

#[derive(Tabled)]
struct EnrollmentRow {
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Course")]
    course: String,
    #[tabled(rename = "Enrolled")]
    enrolled: String,
    #[tabled(rename = "Marks")]
    marks: String,
    #[tabled(rename = "Grade")]
    grade: String,
}

impl From<&Enrollment> for EnrollmentRow {
    fn from(enrollment: &Enrollment) -> Self {
        let (marks, grade) = match &enrollment.grade {
            Some(record) => (format!("{:.1}", record.marks), record.grade.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            student: enrollment.student_id.to_string(),
            course: enrollment.course_code.to_string(),
            enrolled: enrollment.enrolled_at.format("%Y-%m-%d").to_string(),
            marks,
            grade,
        }
    }
}

/// Format a list of enrollments as a table
pub fn format_enrollment_list(enrollments: &[Enrollment]) -> String {
    if enrollments.is_empty() {
        return "No enrollments found.".to_string();
    }

    let graded = enrollments.iter().filter(|e| e.has_grade()).count();
    let mut table = Table::new(enrollments.iter().map(EnrollmentRow::from));
    table.with(Style::psql());
    format!(
        "{}\n{} enrollment(s), {} graded\n",
        table,
        enrollments.len(),
        graded
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseCode, StudentId};

    #[test]
    fn test_format_enrollment_list() {
        let mut graded = Enrollment::new(StudentId::new("S1001"), CourseCode::new("CS101"));
        graded.record_grade(85.0).unwrap();
        let pending = Enrollment::new(StudentId::new("S1001"), CourseCode::new("MA101"));

        let output = format_enrollment_list(&[graded, pending]);
        assert!(output.contains("85.0"));
        assert!(output.contains("A (Excellent)"));
        assert!(output.contains("MA101"));
        assert!(output.contains("2 enrollment(s), 1 graded"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_enrollment_list(&[]).contains("No enrollments found"));
    }
}
