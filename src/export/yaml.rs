//! YAML export of the whole registry

use std::io::Write;

use crate::error::{RegistrarError, RegistrarResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML, preceded by a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, mut writer: W) -> RegistrarResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# Registrar full database export\n\
         # Generated: {}\n\
         # App version: {}\n\
         # Students: {}, courses: {}, enrollments: {}\n\n",
        export.exported_at,
        export.app_version,
        export.metadata.student_count,
        export.metadata.course_count,
        export.metadata.enrollment_count,
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| RegistrarError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| RegistrarError::Export(e.to_string()))
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> RegistrarResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| RegistrarError::Import(e.to_string()))?;
    export.validate().map_err(RegistrarError::Import)?;
    Ok(export)
}
