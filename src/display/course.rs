//! Course display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Course;

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Credits")]
    credits: u32,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Semester")]
    semester: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&Course> for CourseRow {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.to_string(),
            title: course.title.clone(),
            credits: course.credits,
            instructor: course.instructor.clone(),
            department: course.department.clone(),
            semester: course.semester.to_string(),
            status: if course.active { "Active" } else { "Inactive" },
        }
    }
}

/// Format a list of courses as a table
pub fn format_course_list(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No courses found.".to_string();
    }

    let mut table = Table::new(courses.iter().map(CourseRow::from));
    table.with(Style::psql());
    format!("{}\n{} course(s)\n", table, courses.len())
}

/// Format a single course's details along with its enrollment count
pub fn format_course_details(course: &Course, enrollment_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Course: {} - {}\n", course.code, course.title));
    output.push_str(&format!("  Credits:      {}\n", course.credits));
    output.push_str(&format!("  Instructor:   {}\n", course.instructor));
    output.push_str(&format!("  Department:   {}\n", course.department));
    output.push_str(&format!("  Semester:     {}\n", course.semester.display_name()));
    output.push_str(&format!(
        "  Active:       {}\n",
        if course.active { "Yes" } else { "No" }
    ));
    output.push_str(&format!("  Enrolled:     {}\n", enrollment_count));

    output
}
