//! Display formatting for terminal output
//!
//! List views are rendered with `tabled`; detail views and transcripts are
//! formatted by hand.

pub mod course;
pub mod enrollment;
pub mod student;
pub mod transcript;

pub use course::{format_course_details, format_course_list};
pub use enrollment::format_enrollment_list;
pub use student::{format_student_details, format_student_list};
pub use transcript::format_transcript;
