//! Student display formatting
//!
//! Formats students for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Student;

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Reg. No")]
    reg_no: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Courses")]
    courses: usize,
}

impl From<&Student> for StudentRow {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.to_string(),
            reg_no: student.reg_no.clone(),
            name: student.name.full(),
            email: student.email.clone().unwrap_or_default(),
            status: student.status.to_string(),
            courses: student.enrolled_courses.len(),
        }
    }
}

/// Format a list of students as a table
pub fn format_student_list(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }

    let rows: Vec<StudentRow> = students.iter().map(StudentRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n{} student(s)\n", table, students.len())
}

/// Format a single student's details
pub fn format_student_details(student: &Student) -> String {
    let mut output = String::new();

    output.push_str(&format!("Student: {}\n", student.name));
    output.push_str(&format!("  ID:            {}\n", student.id));
    output.push_str(&format!("  Reg. No:       {}\n", student.reg_no));
    output.push_str(&format!(
        "  Email:         {}\n",
        student.email.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("  Status:        {}\n", student.status));
    output.push_str(&format!(
        "  Registered:    {}\n",
        student.registered_at.format("%Y-%m-%d")
    ));

    output.push('\n');
    if student.enrolled_courses.is_empty() {
        output.push_str("  Enrolled in no courses\n");
    } else {
        let codes: Vec<&str> = student.enrolled_courses.iter().map(|c| c.as_str()).collect();
        output.push_str(&format!("  Courses:       {}\n", codes.join(", ")));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Modified: {}\n",
        student.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseCode, PersonName};

    fn ada() -> Student {
        let mut student = Student::new("S1001", "REG-1", PersonName::new("Ada", "Lovelace"))
            .with_email("ada@example.edu");
        student.add_course(CourseCode::new("CS101"));
        student
    }

    #[test]
    fn test_format_student_list() {
        let output = format_student_list(&[ada()]);
        assert!(output.contains("Reg. No"));
        assert!(output.contains("Ada Lovelace"));
        assert!(output.contains("ada@example.edu"));
        assert!(output.contains("1 student(s)"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_student_list(&[]).contains("No students found"));
    }

    #[test]
    fn test_format_student_details() {
        let output = format_student_details(&ada());
        assert!(output.contains("Student: Ada Lovelace"));
        assert!(output.contains("REG-1"));
        assert!(output.contains("Courses:       CS101"));

        let bare = Student::new("S1002", "REG-2", PersonName::new("Grace", "Hopper"));
        let output = format_student_details(&bare);
        assert!(output.contains("Email:         -"));
        assert!(output.contains("Enrolled in no courses"));
    }
}
