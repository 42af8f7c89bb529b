//! Core data models for Registrar
//!
//! This module contains the data structures that represent the academic
//! records domain: students, courses, enrollments and grades.

pub mod course;
pub mod enrollment;
pub mod grade;
pub mod ids;
pub mod semester;
pub mod student;

pub use course::{Course, DEFAULT_COURSE_CREDITS};
pub use enrollment::{Enrollment, GradeRecord};
pub use grade::Grade;
pub use ids::{CourseCode, EnrollmentId, StudentId};
pub use semester::Semester;
pub use student::{PersonName, Student, StudentStatus};
