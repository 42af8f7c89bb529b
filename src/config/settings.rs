//! User settings for Registrar
//!
//! Holds the academic policy knobs (credit caps) along with backup
//! retention and reporting preferences.

use serde::{Deserialize, Serialize};

use super::paths::RegistrarPaths;
use crate::error::RegistrarError;

/// Maximum total credits a student may carry in one semester
pub const DEFAULT_MAX_CREDITS_PER_SEMESTER: u32 = 20;

/// Maximum credits a single course may carry
pub const DEFAULT_MAX_COURSE_CREDITS: u32 = 10;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of most recent backups kept by `backup prune`
    pub keep_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { keep_count: 10 }
    }
}

/// User settings for Registrar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name printed on transcripts and in the menu banner
    #[serde(default = "default_institution_name")]
    pub institution_name: String,

    /// Per-semester credit cap enforced at enrollment
    #[serde(default = "default_max_credits_per_semester")]
    pub max_credits_per_semester: u32,

    /// Upper bound on a single course's credits
    #[serde(default = "default_max_course_credits")]
    pub max_course_credits: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Default size of the "top students" report
    #[serde(default = "default_top_students_limit")]
    pub top_students_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_institution_name() -> String {
    "Campus Records Office".to_string()
}

fn default_max_credits_per_semester() -> u32 {
    DEFAULT_MAX_CREDITS_PER_SEMESTER
}

fn default_max_course_credits() -> u32 {
    DEFAULT_MAX_COURSE_CREDITS
}

fn default_top_students_limit() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            institution_name: default_institution_name(),
            max_credits_per_semester: default_max_credits_per_semester(),
            max_course_credits: default_max_course_credits(),
            backup_retention: BackupRetention::default(),
            top_students_limit: default_top_students_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &RegistrarPaths) -> Result<Self, RegistrarError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| RegistrarError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            RegistrarError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RegistrarPaths) -> Result<(), RegistrarError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            RegistrarError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| RegistrarError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings that would make every enrollment impossible
    pub fn validate(&self) -> Result<(), RegistrarError> {
        if self.max_credits_per_semester == 0 {
            return Err(RegistrarError::Config(
                "max_credits_per_semester must be positive".into(),
            ));
        }
        if self.max_course_credits == 0 {
            return Err(RegistrarError::Config(
                "max_course_credits must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_credits_per_semester, 20);
        assert_eq!(settings.max_course_credits, 10);
        assert_eq!(settings.backup_retention.keep_count, 10);
        assert_eq!(settings.top_students_limit, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.max_credits_per_semester = 24;
        settings.institution_name = "North Campus".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.max_credits_per_semester, 24);
        assert_eq!(loaded.institution_name, "North Campus");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"institution_name": "X"}"#).unwrap();
        assert_eq!(settings.institution_name, "X");
        assert_eq!(settings.max_credits_per_semester, 20);
    }

    #[test]
    fn test_zero_credit_cap_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"max_credits_per_semester": 0}"#).unwrap();

        let result = Settings::load_or_create(&paths);
        assert!(matches!(result, Err(RegistrarError::Config(_))));
    }
}
