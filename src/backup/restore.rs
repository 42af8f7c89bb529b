//! Backup restoration for Registrar
//!
//! Copies the registry files of a named backup back into the data directory.
//! Every file is checked to be valid JSON before anything is overwritten.

use std::fs;
use std::path::PathBuf;

use crate::config::paths::RegistrarPaths;
use crate::error::{RegistrarError, RegistrarResult};
use crate::storage::write_json_atomic;

use super::manager::BackupManager;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: RegistrarPaths,
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    /// Name of the backup restored from
    pub backup_name: String,
    /// Registry files written back, by file name
    pub restored: Vec<String>,
    /// Registry files absent from the backup and left untouched
    pub missing: Vec<String>,
}

impl RestoreResult {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored from {}: {}",
            self.backup_name,
            if self.restored.is_empty() {
                "nothing".to_string()
            } else {
                self.restored.join(", ")
            }
        );
        if !self.missing.is_empty() {
            summary.push_str(&format!(" (not in backup: {})", self.missing.join(", ")));
        }
        summary
    }
}

impl RestoreManager {
    pub fn new(paths: RegistrarPaths) -> Self {
        Self { paths }
    }

    /// Restore the data files from the backup called `name`
    ///
    /// This overwrites current data. Reload storage afterwards.
    pub fn restore(&self, name: &str) -> RegistrarResult<RestoreResult> {
        let backup = BackupManager::new(self.paths.clone())
            .get_backup(name)?
            .ok_or_else(|| RegistrarError::backup_not_found(name.trim()))?;

        let backup_data = backup.path.join("data");
        let mut result = RestoreResult {
            backup_name: backup.name.clone(),
            ..RestoreResult::default()
        };

        // Validate everything before the first write
        let mut staged: Vec<(PathBuf, serde_json::Value)> = Vec::new();
        for destination in self.paths.data_files() {
            let Some(file_name) = destination.file_name() else {
                continue;
            };
            let file_name = file_name.to_string_lossy().to_string();
            let source = backup_data.join(&file_name);
            if !source.exists() {
                result.missing.push(file_name);
                continue;
            }

            let contents = fs::read_to_string(&source).map_err(|e| {
                RegistrarError::Backup(format!("Failed to read {}: {}", source.display(), e))
            })?;
            let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
                RegistrarError::Backup(format!(
                    "{} in backup {} is not valid JSON: {}",
                    file_name, backup.name, e
                ))
            })?;
            staged.push((destination, value));
            result.restored.push(file_name);
        }

        if staged.is_empty() {
            return Err(RegistrarError::Backup(format!(
                "Backup {} contains no data files",
                backup.name
            )));
        }

        self.paths.ensure_directories()?;
        for (destination, value) in staged {
            write_json_atomic(&destination, &value)?;
        }

        tracing::info!(backup = %backup.name, files = result.restored.len(), "backup restored");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_env() -> (RestoreManager, BackupManager, RegistrarPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        for file in paths.data_files() {
            fs::write(file, "{}").unwrap();
        }

        let backup_manager = BackupManager::new(paths.clone());
        let restore_manager = RestoreManager::new(paths.clone());
        (restore_manager, backup_manager, paths, temp_dir)
    }

    #[test]
    fn test_restore_from_backup() {
        let (restore_manager, backup_manager, paths, _temp) = create_test_env();
        fs::write(paths.students_file(), r#"{"S1001":{"id":"S1001"}}"#).unwrap();
        let backup = backup_manager.create_backup().unwrap();

        fs::write(paths.students_file(), "{}").unwrap();

        let result = restore_manager.restore(&backup.name).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.restored.len(), 3);
        assert!(result.summary().contains("students.json"));
        assert!(fs::read_to_string(paths.students_file())
            .unwrap()
            .contains("S1001"));
    }

    #[test]
    fn test_restore_unknown_backup() {
        let (restore_manager, _backup_manager, _paths, _temp) = create_test_env();
        let err = restore_manager.restore("backup_20200101_000000_000").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_corrupt_backup_leaves_data_untouched() {
        let (restore_manager, backup_manager, paths, _temp) = create_test_env();
        fs::write(paths.courses_file(), r#"{"CS101":{}}"#).unwrap();
        let backup = backup_manager.create_backup().unwrap();
        fs::write(backup.path.join("data").join("enrollments.json"), "not json").unwrap();

        fs::write(paths.courses_file(), "{}").unwrap();
        let err = restore_manager.restore(&backup.name).unwrap_err();
        assert!(matches!(err, RegistrarError::Backup(_)));
        assert_eq!(fs::read_to_string(paths.courses_file()).unwrap(), "{}");
    }

    #[test]
    fn test_partial_backup_reports_missing() {
        let (restore_manager, backup_manager, _paths, _temp) = create_test_env();
        let backup = backup_manager.create_backup().unwrap();
        fs::remove_file(backup.path.join("data").join("enrollments.json")).unwrap();

        let result = restore_manager.restore(&backup.name).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.missing, vec!["enrollments.json".to_string()]);
    }
}
