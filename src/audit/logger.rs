//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{RegistrarError, RegistrarResult};

use super::entry::{AuditEntry, EntityType};

/// Writes audit entries to a line-delimited JSON file, one entry per line
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry and flush it to disk
    pub fn log(&self, entry: &AuditEntry) -> RegistrarResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| RegistrarError::Io(format!("Failed to open audit log: {}", e)))?;

        let line = serde_json::to_string(entry)
            .map_err(|e| RegistrarError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| RegistrarError::Io(format!("Failed to write audit entry: {}", e)))?;

        tracing::trace!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "audit entry written"
        );
        Ok(())
    }

    /// Read every entry, oldest first. Blank lines are ignored.
    pub fn read_all(&self) -> RegistrarResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| RegistrarError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                RegistrarError::Io(format!("Failed to read audit log line {}: {}", idx + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                RegistrarError::Json(format!("Bad audit entry at line {}: {}", idx + 1, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> RegistrarResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Entries about one entity type, optionally narrowed to one id
    pub fn read_for(
        &self,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> RegistrarResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.concerns(entity_type, entity_id))
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn log_student(logger: &AuditLogger, id: &str) {
        let entry = AuditEntry::create(EntityType::Student, id, None, &json!({ "id": id }));
        logger.log(&entry).unwrap();
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        log_student(&logger, "S1001");

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Student);
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (logger, _temp) = create_test_logger();
        for i in 0..6 {
            log_student(&logger, &format!("S100{}", i));
        }

        let ids: Vec<_> = logger
            .read_recent(2)
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["S1004", "S1005"]);
    }

    #[test]
    fn test_read_for_filters() {
        let (logger, _temp) = create_test_logger();
        log_student(&logger, "S1001");
        log_student(&logger, "S1002");
        logger
            .log(&AuditEntry::create(
                EntityType::Course,
                "CS101",
                None,
                &json!({}),
            ))
            .unwrap();

        assert_eq!(logger.read_for(EntityType::Student, None).unwrap().len(), 2);
        assert_eq!(
            logger
                .read_for(EntityType::Student, Some("S1002"))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(logger.read_for(EntityType::Enrollment, None).unwrap().len(), 0);
    }

    #[test]
    fn test_reopen_reads_previous_entries() {
        let (logger, temp) = create_test_logger();
        log_student(&logger, "S1001");

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }
}
