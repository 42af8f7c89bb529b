//! JSON export of the whole registry
//!
//! The export carries a schema version and counts so it can be checked
//! before it is trusted.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{Course, Enrollment, Student};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Version of the tool that wrote the export
    pub app_version: String,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub student_count: usize,
    pub active_student_count: usize,
    pub course_count: usize,
    pub enrollment_count: usize,
    /// Enrollments with a recorded grade
    pub graded_count: usize,
}

impl FullExport {
    /// Snapshot every registry in storage
    pub fn from_storage(storage: &Storage) -> RegistrarResult<Self> {
        let students = storage.students.get_all()?;
        let courses = storage.courses.get_all()?;
        let enrollments = storage.enrollments.get_all()?;

        let metadata = ExportMetadata {
            student_count: students.len(),
            active_student_count: students.iter().filter(|s| s.is_active()).count(),
            course_count: courses.len(),
            enrollment_count: enrollments.len(),
            graded_count: enrollments.iter().filter(|e| e.has_grade()).count(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            students,
            courses,
            enrollments,
            metadata,
        })
    }

    /// Check the schema version, counts and cross references
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        if self.metadata.student_count != self.students.len()
            || self.metadata.course_count != self.courses.len()
            || self.metadata.enrollment_count != self.enrollments.len()
        {
            return Err("Metadata counts do not match the exported records".into());
        }

        let student_ids: HashSet<_> = self.students.iter().map(|s| &s.id).collect();
        let course_codes: HashSet<_> = self.courses.iter().map(|c| &c.code).collect();

        let mut pairs = HashSet::new();
        for e in &self.enrollments {
            if !student_ids.contains(&e.student_id) {
                return Err(format!(
                    "Enrollment {} references unknown student {}",
                    e.id, e.student_id
                ));
            }
            if !course_codes.contains(&e.course_code) {
                return Err(format!(
                    "Enrollment {} references unknown course {}",
                    e.id, e.course_code
                ));
            }
            if !pairs.insert((&e.student_id, &e.course_code)) {
                return Err(format!(
                    "Duplicate enrollment of {} in {}",
                    e.student_id, e.course_code
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> RegistrarResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| RegistrarError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> RegistrarResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| RegistrarError::Import(e.to_string()))?;
    export.validate().map_err(RegistrarError::Import)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseCode, Enrollment, StudentId};
    use crate::testing::{empty_storage, seeded_storage};

    #[test]
    fn test_full_export() {
        let (_temp, storage) = seeded_storage();
        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.metadata.student_count, 4);
        assert_eq!(export.metadata.active_student_count, 3);
        assert_eq!(export.metadata.course_count, 3);
        assert_eq!(export.metadata.enrollment_count, 6);
        assert_eq!(export.metadata.graded_count, 4);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let (_temp, storage) = seeded_storage();
        let mut buf = Vec::new();
        export_full_json(&storage, &mut buf, true).unwrap();

        let imported = import_from_json(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(imported.enrollments.len(), 6);
    }

    #[test]
    fn test_validate_rejects_dangling_enrollment() {
        let (_temp, storage) = empty_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export
            .enrollments
            .push(Enrollment::new(StudentId::new("S1"), CourseCode::new("C1")));
        export.metadata.enrollment_count = 1;

        let err = export.validate().unwrap_err();
        assert!(err.contains("unknown student"));
    }

    #[test]
    fn test_schema_mismatch() {
        let (_temp, storage) = empty_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().unwrap_err().contains("Schema version"));
    }
}
