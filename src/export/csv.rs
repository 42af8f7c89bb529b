//! CSV export of students, courses and enrollments

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::config::paths::RegistrarPaths;
use crate::error::{RegistrarError, RegistrarResult};
use crate::storage::Storage;

pub const STUDENT_HEADERS: [&str; 7] = [
    "ID",
    "RegNo",
    "FirstName",
    "LastName",
    "Email",
    "Status",
    "CreatedAt",
];

pub const COURSE_HEADERS: [&str; 8] = [
    "Code",
    "Title",
    "Credits",
    "Instructor",
    "Department",
    "Semester",
    "Active",
    "CreatedAt",
];

pub const ENROLLMENT_HEADERS: [&str; 6] = [
    "StudentID",
    "CourseCode",
    "EnrolledAt",
    "Marks",
    "Grade",
    "GradePoints",
];

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default file for an export, e.g. `exports/students_20240131_142500.csv`
pub fn default_export_path(paths: &RegistrarPaths, prefix: &str) -> PathBuf {
    paths.exports_dir().join(format!(
        "{}_{}.csv",
        prefix,
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write all students as CSV; returns the number of rows
pub fn export_students_csv<W: Write>(storage: &Storage, writer: W) -> RegistrarResult<usize> {
    let students = storage.students.get_all()?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(STUDENT_HEADERS)?;
    for s in &students {
        let status = s.status.to_string();
        let created = timestamp(&s.created_at);
        csv.write_record([
            s.id.as_str(),
            s.reg_no.as_str(),
            s.name.first.as_str(),
            s.name.last.as_str(),
            s.email.as_deref().unwrap_or(""),
            status.as_str(),
            created.as_str(),
        ])?;
    }
    csv.flush()
        .map_err(|e| RegistrarError::Export(e.to_string()))?;

    Ok(students.len())
}

/// Write all courses as CSV; returns the number of rows
pub fn export_courses_csv<W: Write>(storage: &Storage, writer: W) -> RegistrarResult<usize> {
    let courses = storage.courses.get_all()?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(COURSE_HEADERS)?;
    for c in &courses {
        csv.write_record([
            c.code.to_string(),
            c.title.clone(),
            c.credits.to_string(),
            c.instructor.clone(),
            c.department.clone(),
            c.semester.to_string(),
            c.active.to_string(),
            timestamp(&c.created_at),
        ])?;
    }
    csv.flush()
        .map_err(|e| RegistrarError::Export(e.to_string()))?;

    Ok(courses.len())
}

/// Write all enrollments as CSV; ungraded rows leave the grade columns blank
pub fn export_enrollments_csv<W: Write>(storage: &Storage, writer: W) -> RegistrarResult<usize> {
    let enrollments = storage.enrollments.get_all()?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(ENROLLMENT_HEADERS)?;
    for e in &enrollments {
        let (marks, grade, points) = match &e.grade {
            Some(g) => (
                format!("{:.1}", g.marks),
                g.grade.letter().to_string(),
                format!("{:.1}", g.grade.grade_point()),
            ),
            None => Default::default(),
        };
        csv.write_record([
            e.student_id.to_string(),
            e.course_code.to_string(),
            timestamp(&e.enrolled_at),
            marks,
            grade,
            points,
        ])?;
    }
    csv.flush()
        .map_err(|e| RegistrarError::Export(e.to_string()))?;

    Ok(enrollments.len())
}

/// Create `path` (and its parent) and run `export` against it
pub fn export_to_file<F>(path: &Path, export: F) -> RegistrarResult<usize>
where
    F: FnOnce(&mut File) -> RegistrarResult<usize>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path).map_err(|e| {
        RegistrarError::Export(format!("Cannot create {}: {}", path.display(), e))
    })?;
    let rows = export(&mut file)?;
    tracing::info!(file = %path.display(), rows, "csv export written");
    Ok(rows)
}
