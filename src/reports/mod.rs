//! Reports module for Registrar
//!
//! Derived academic reports: GPA rankings, GPA distribution and course
//! enrollment statistics. Each report is generated from storage and can be
//! rendered for the terminal.

pub mod enrollment_stats;
pub mod gpa_distribution;
pub mod top_students;

pub use enrollment_stats::{CourseEnrollmentRow, EnrollmentStatsReport};
pub use gpa_distribution::{GpaBand, GpaDistributionReport};
pub use top_students::{RankedStudent, TopStudentsReport};

