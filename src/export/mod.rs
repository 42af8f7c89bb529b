//! Export module for Registrar
//!
//! - CSV: students, courses and enrollments (spreadsheet-compatible)
//! - JSON: machine-readable full database export
//! - YAML: human-readable full database export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{
    default_export_path, export_courses_csv, export_enrollments_csv, export_students_csv,
    export_to_file,
};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
