//! Path management for Registrar
//!
//! ## Path Resolution Order
//!
//! 1. `REGISTRAR_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory joined with `registrar`
//!    (`~/.config/registrar` on Linux, `%APPDATA%\registrar` on Windows)

use std::path::PathBuf;

use crate::error::RegistrarError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "REGISTRAR_DATA_DIR";

/// Manages all paths used by Registrar
#[derive(Debug, Clone)]
pub struct RegistrarPaths {
    /// Base directory for all Registrar data
    base_dir: PathBuf,
}

impl RegistrarPaths {
    /// Create a new RegistrarPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform configuration directory can be found
    /// and the override variable is not set.
    pub fn new() -> Result<Self, RegistrarError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create RegistrarPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (JSON registries)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory CSV exports are written to by default
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to students.json
    pub fn students_file(&self) -> PathBuf {
        self.data_dir().join("students.json")
    }

    /// Get the path to courses.json
    pub fn courses_file(&self) -> PathBuf {
        self.data_dir().join("courses.json")
    }

    /// Get the path to enrollments.json
    pub fn enrollments_file(&self) -> PathBuf {
        self.data_dir().join("enrollments.json")
    }

    /// All registry files, in the order they are backed up and restored
    pub fn data_files(&self) -> [PathBuf; 3] {
        [
            self.students_file(),
            self.courses_file(),
            self.enrollments_file(),
        ]
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), RegistrarError> {
        for dir in [
            self.base_dir.clone(),
            self.data_dir(),
            self.exports_dir(),
            self.backup_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                RegistrarError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        Ok(())
    }

    /// Check if Registrar has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, RegistrarError> {
    let dirs = directories::BaseDirs::new().ok_or_else(|| {
        RegistrarError::Config(format!(
            "Could not determine a configuration directory; set {}",
            DATA_DIR_ENV
        ))
    })?;
    Ok(dirs.config_dir().join("registrar"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.exports_dir(), temp_dir.path().join("exports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.exports_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.students_file(),
            temp_dir.path().join("data").join("students.json")
        );
        assert_eq!(paths.data_files().len(), 3);
    }
}
