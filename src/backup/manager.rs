//! Backup manager for Registrar
//!
//! Each backup is a directory named `backup_YYYYMMDD_HHMMSS_mmm` holding a
//! copy of the data directory, the exports directory and a plain-text
//! manifest listing every copied file with its size.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::config::paths::RegistrarPaths;
use crate::error::{RegistrarError, RegistrarResult};

use super::usage::directory_size;

/// Name of the manifest written into every backup
pub const MANIFEST_FILE: &str = "backup_manifest.txt";

const PREFIX: &str = "backup_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup directory name
    pub name: String,
    /// Full path to the backup directory
    pub path: PathBuf,
    /// When the backup was created, from its name
    pub created_at: DateTime<Utc>,
    /// Total size of the backup in bytes
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: RegistrarPaths,
}

fn backup_error(context: &str, path: &Path, err: std::io::Error) -> RegistrarError {
    RegistrarError::Backup(format!("{} {}: {}", context, path.display(), err))
}

impl BackupManager {
    pub fn new(paths: RegistrarPaths) -> Self {
        let backup_dir = paths.backup_dir();
        Self { backup_dir, paths }
    }

    /// Create a backup of the data and exports directories
    ///
    /// Returns the info of the created backup.
    pub fn create_backup(&self) -> RegistrarResult<BackupInfo> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| backup_error("Failed to create", &self.backup_dir, e))?;

        let (name, created_at, target) = self.reserve_directory()?;

        let copied = match self.fill_backup(&target, created_at) {
            Ok(copied) => copied,
            Err(err) => {
                if let Err(e) = fs::remove_dir_all(&target) {
                    tracing::warn!(backup = %name, "failed to remove incomplete backup: {}", e);
                }
                return Err(err);
            }
        };

        tracing::info!(backup = %name, files = copied.len(), "backup created");

        Ok(BackupInfo {
            size_bytes: directory_size(&target),
            name,
            path: target,
            created_at,
        })
    }

    /// Copy the data and exports trees into `target`, manifest last
    fn fill_backup(
        &self,
        target: &Path,
        created_at: DateTime<Utc>,
    ) -> RegistrarResult<Vec<(PathBuf, u64)>> {
        let mut copied = Vec::new();
        for source in [self.paths.data_dir(), self.paths.exports_dir()] {
            if let Some(dir_name) = source.file_name() {
                copy_tree(&source, &target.join(dir_name), Path::new(dir_name), &mut copied)?;
            }
        }

        write_manifest(target, created_at, &copied)?;
        Ok(copied)
    }

    /// Pick an unused timestamped directory name and create it
    fn reserve_directory(&self) -> RegistrarResult<(String, DateTime<Utc>, PathBuf)> {
        loop {
            let now = Utc::now();
            let name = format!(
                "{}{}_{:03}",
                PREFIX,
                now.format(TIMESTAMP_FORMAT),
                now.timestamp_subsec_millis()
            );
            let target = self.backup_dir.join(&name);
            match fs::create_dir(&target) {
                Ok(()) => {
                    // Round-trip through the name so listed and returned times agree
                    let created_at = parse_backup_timestamp(&name).unwrap_or(now);
                    return Ok((name, created_at, target));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                Err(e) => return Err(backup_error("Failed to create", &target, e)),
            }
        }
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> RegistrarResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| backup_error("Failed to read", &self.backup_dir, e))?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| backup_error("Failed to read", &self.backup_dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.name.cmp(&a.name)));

        Ok(backups)
    }

    /// Delete all but the newest `keep` backups
    ///
    /// Returns the names of the deleted backups.
    pub fn prune(&self, keep: usize) -> RegistrarResult<Vec<String>> {
        let mut deleted = Vec::new();
        for backup in self.list_backups()?.into_iter().skip(keep) {
            fs::remove_dir_all(&backup.path)
                .map_err(|e| backup_error("Failed to delete", &backup.path, e))?;
            tracing::info!(backup = %backup.name, "old backup deleted");
            deleted.push(backup.name);
        }
        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by directory name
    pub fn get_backup(&self, name: &str) -> RegistrarResult<Option<BackupInfo>> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Ok(None);
        }
        let path = self.backup_dir.join(name);
        if path.is_dir() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    pub fn get_latest_backup(&self) -> RegistrarResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Only directories holding a manifest count as backups
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let name = path.file_name()?.to_string_lossy().to_string();
    let created_at = parse_backup_timestamp(&name)?;
    if !path.join(MANIFEST_FILE).is_file() {
        return None;
    }
    Some(BackupInfo {
        size_bytes: directory_size(path),
        path: path.to_path_buf(),
        name,
        created_at,
    })
}

/// Parse the creation time out of `backup_YYYYMMDD_HHMMSS_mmm`
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(PREFIX)?;
    let (stamp, millis) = match rest.rsplit_once('_') {
        Some((stamp, millis)) if stamp.contains('_') => (stamp, millis.parse::<u32>().ok()?),
        _ => (rest, 0),
    };

    let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    let naive = naive.checked_add_signed(chrono::Duration::milliseconds(i64::from(millis)))?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Recursively copy `source` into `target`, recording `(relative path, size)`
/// for every file. A missing source is skipped.
fn copy_tree(
    source: &Path,
    target: &Path,
    relative: &Path,
    copied: &mut Vec<(PathBuf, u64)>,
) -> RegistrarResult<()> {
    if !source.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(target).map_err(|e| backup_error("Failed to create", target, e))?;

    let mut entries = fs::read_dir(source)
        .map_err(|e| backup_error("Failed to read", source, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| backup_error("Failed to read", source, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name();
        if path.is_dir() {
            copy_tree(&path, &target.join(&name), &relative.join(&name), copied)?;
        } else {
            let bytes = fs::copy(&path, target.join(&name))
                .map_err(|e| backup_error("Failed to copy", &path, e))?;
            copied.push((relative.join(&name), bytes));
        }
    }

    Ok(())
}

fn write_manifest(
    target: &Path,
    created_at: DateTime<Utc>,
    files: &[(PathBuf, u64)],
) -> RegistrarResult<()> {
    let path = target.join(MANIFEST_FILE);
    let mut manifest =
        fs::File::create(&path).map_err(|e| backup_error("Failed to create", &path, e))?;

    let mut body = String::new();
    body.push_str(&format!("Created: {}\n", created_at.format("%Y-%m-%d %H:%M:%S")));
    body.push_str(&format!("Backup Directory: {}\n", target.display()));
    body.push_str("Files included:\n");
    for (relative, size) in files {
        // Forward slashes keep manifests identical across platforms
        let relative = relative.to_string_lossy().replace('\\', "/");
        body.push_str(&format!("- {} ({} bytes)\n", relative, size));
    }

    manifest
        .write_all(body.as_bytes())
        .map_err(|e| backup_error("Failed to write", &path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, RegistrarPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        fs::write(paths.students_file(), r#"{"S1001":{}}"#).unwrap();
        fs::write(paths.courses_file(), "{}").unwrap();

        (BackupManager::new(paths.clone()), paths, temp_dir)
    }

    #[test]
    fn test_create_backup_copies_files_and_manifest() {
        let (manager, paths, _temp) = create_test_manager();
        fs::write(paths.exports_dir().join("students.csv"), "id\nS1001\n").unwrap();

        let backup = manager.create_backup().unwrap();
        assert!(backup.name.starts_with("backup_"));
        assert!(backup.path.join("data").join("students.json").exists());
        assert!(backup.path.join("exports").join("students.csv").exists());

        let manifest = fs::read_to_string(backup.path.join(MANIFEST_FILE)).unwrap();
        assert!(manifest.starts_with("Created: "));
        assert!(manifest.contains("Backup Directory: "));
        assert!(manifest.contains("- data/students.json (12 bytes)"));
        assert!(manifest.contains("- exports/students.csv (9 bytes)"));
        assert!(backup.size_bytes > 0);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _paths, _temp) = create_test_manager();

        let first = manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let second = manager.create_backup().unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].name, second.name);
        assert_eq!(backups[1].name, first.name);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().name, second.name);
    }

    #[test]
    fn test_prune_keeps_newest() {
        let (manager, _paths, _temp) = create_test_manager();
        let mut names = Vec::new();
        for _ in 0..4 {
            names.push(manager.create_backup().unwrap().name);
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let deleted = manager.prune(2).unwrap();
        assert_eq!(deleted, vec![names[1].clone(), names[0].clone()]);

        let remaining: Vec<_> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(remaining, vec![names[3].clone(), names[2].clone()]);
        assert!(manager.prune(5).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_directories_are_ignored() {
        let (manager, paths, _temp) = create_test_manager();
        fs::create_dir_all(paths.backup_dir().join("scratch")).unwrap();
        manager.create_backup().unwrap();

        assert_eq!(manager.list_backups().unwrap().len(), 1);
        assert!(manager.get_backup("scratch").unwrap().is_none());
        assert!(manager.get_backup("../data").unwrap().is_none());
    }

    #[test]
    fn test_directory_without_manifest_is_not_a_backup() {
        let (manager, paths, _temp) = create_test_manager();
        let good = manager.create_backup().unwrap();

        let half_written = paths.backup_dir().join("backup_29991231_235959_999");
        fs::create_dir_all(half_written.join("data")).unwrap();
        fs::write(half_written.join("data").join("students.json"), "{}").unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].name, good.name);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().name, good.name);
        assert!(manager
            .get_backup("backup_29991231_235959_999")
            .unwrap()
            .is_none());

        // The incomplete directory does not count toward the keep limit
        assert!(manager.prune(1).unwrap().is_empty());
        assert!(good.path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_backup_is_removed() {
        let (manager, paths, _temp) = create_test_manager();
        std::os::unix::fs::symlink(
            paths.data_dir().join("missing.json"),
            paths.data_dir().join("dangling.json"),
        )
        .unwrap();

        let err = manager.create_backup().unwrap_err();
        assert!(matches!(err, RegistrarError::Backup(_)));
        assert_eq!(fs::read_dir(paths.backup_dir()).unwrap().count(), 0);
        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let ts = parse_backup_timestamp("backup_20251127_143022_456").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 11, 27));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 30, 22));
        assert_eq!(ts.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("backup_20251127_143022").is_some());
        assert!(parse_backup_timestamp("backup_garbage").is_none());
        assert!(parse_backup_timestamp("snapshot_20251127_143022_456").is_none());
    }

    #[test]
    fn test_empty_backup_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let manager = BackupManager::new(paths);
        assert!(manager.list_backups().unwrap().is_empty());
    }
}
