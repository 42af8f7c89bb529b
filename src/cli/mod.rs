//! CLI command handlers
//!
//! Bridges clap argument parsing and the interactive menu with the service
//! layer.

pub mod audit;
pub mod backup;
pub mod course;
pub mod enrollment;
pub mod export;
pub mod import;
pub mod menu;
pub mod report;
pub mod student;

pub use audit::{handle_audit_command, AuditArgs};
pub use backup::{handle_backup_command, BackupCommands};
pub use course::{handle_course_command, CourseCommands};
pub use enrollment::{
    handle_enroll_command, handle_grade_command, handle_transcript_command, EnrollCommands,
    GradeArgs, TranscriptArgs,
};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportCommands};
pub use menu::Menu;
pub use report::{handle_report_command, ReportCommands};
pub use student::{handle_student_command, StudentCommands};

use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{Semester, StudentStatus};

pub(crate) fn parse_semester(s: &str) -> RegistrarResult<Semester> {
    Semester::parse(s).ok_or_else(|| {
        RegistrarError::Validation(format!(
            "Invalid semester: '{}'. Valid semesters: spring, summer, fall",
            s.trim()
        ))
    })
}

pub(crate) fn parse_status(s: &str) -> RegistrarResult<StudentStatus> {
    StudentStatus::parse(s).ok_or_else(|| {
        RegistrarError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: active, inactive, graduated, suspended",
            s.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_semester(" Fall ").unwrap(), Semester::Fall);
        assert!(parse_semester("winter").unwrap_err().is_validation());
        assert_eq!(parse_status("SUSPENDED").unwrap(), StudentStatus::Suspended);
        assert!(parse_status("expelled").unwrap_err().is_validation());
    }
}
