//! Service layer for Registrar
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, cross-registry rules and audit logging.

pub mod course;
pub mod enrollment;
pub mod import;
pub mod student;
pub mod transcript;

pub use course::{CourseSearch, CourseService, CourseUpdate, NewCourse};
pub use enrollment::{check_enrollment, EnrollmentService};
pub use import::{ImportResult, ImportService};
pub use student::{NewStudent, StudentService, StudentStats, StudentUpdate};
pub use transcript::{weighted_gpa, SemesterRecord, Transcript, TranscriptLine, TranscriptService};
