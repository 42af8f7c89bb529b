//! Shared fixtures for unit tests

use tempfile::TempDir;

use crate::config::paths::RegistrarPaths;
use crate::models::Semester;
use crate::services::{CourseService, EnrollmentService, NewCourse, NewStudent, StudentService};
use crate::storage::Storage;

/// Storage in a temp dir, loaded and empty
pub(crate) fn empty_storage() -> (TempDir, Storage) {
    let temp_dir = TempDir::new().unwrap();
    let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
    let mut storage = Storage::new(paths).unwrap();
    storage.load_all().unwrap();
    (temp_dir, storage)
}

/// A small registry:
///
/// | student | status   | enrollments (marks)             | GPA  |
/// |---------|----------|---------------------------------|------|
/// | S1001   | active   | CS101 (75), HI100 (85)          | 8.43 |
/// | S1002   | active   | CS101 (95), MA101 (92)          | 10.0 |
/// | S1003   | active   | CS101 (ungraded)                | 0.0  |
/// | S1009   | inactive | HI100 (ungraded)                | 0.0  |
///
/// CS101 is fall/4 credits, MA101 fall/2, HI100 spring/3.
pub(crate) fn seeded_storage() -> (TempDir, Storage) {
    let (temp_dir, storage) = empty_storage();

    let students = StudentService::new(&storage);
    for (id, first, last) in [
        ("S1001", "Ada", "Lovelace"),
        ("S1002", "Grace", "Hopper"),
        ("S1003", "Alan", "Turing"),
        ("S1009", "Inactive", "Student"),
    ] {
        students
            .add(NewStudent {
                id: id.into(),
                reg_no: format!("REG-{}", id),
                first_name: first.into(),
                last_name: last.into(),
                email: Some(format!("{}@example.edu", first.to_lowercase())),
            })
            .unwrap();
    }

    let courses = CourseService::new(&storage);
    for (code, title, credits, semester) in [
        ("CS101", "Intro to Programming", 4, Semester::Fall),
        ("MA101", "Calculus I", 2, Semester::Fall),
        ("HI100", "World History", 3, Semester::Spring),
    ] {
        courses
            .add(NewCourse {
                code: code.into(),
                title: title.into(),
                credits: Some(credits),
                instructor: "Staff".into(),
                department: "General".into(),
                semester: Some(semester),
            })
            .unwrap();
    }

    let enrollments = EnrollmentService::new(&storage);
    for (student, course) in [
        ("S1001", "CS101"),
        ("S1001", "HI100"),
        ("S1002", "CS101"),
        ("S1002", "MA101"),
        ("S1003", "CS101"),
        ("S1009", "HI100"),
    ] {
        enrollments.enroll(student, course).unwrap();
    }
    for (student, course, marks) in [
        ("S1001", "CS101", 75.0),
        ("S1001", "HI100", 85.0),
        ("S1002", "CS101", 95.0),
        ("S1002", "MA101", 92.0),
    ] {
        enrollments.record_grade(student, course, marks).unwrap();
    }

    students.deactivate("S1009").unwrap();
    (temp_dir, storage)
}
