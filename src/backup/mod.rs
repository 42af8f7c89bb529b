//! Backup system for Registrar
//!
//! - `BackupManager` creates timestamped backup directories, lists them and
//!   prunes old ones
//! - `RestoreManager` copies the registry files of a backup back into place
//! - `usage` reports disk usage of the data directories
//!
//! # Example
//!
//! ```rust,ignore
//! use registrar::backup::{BackupManager, RestoreManager};
//! use registrar::config::paths::RegistrarPaths;
//!
//! let paths = RegistrarPaths::new()?;
//! let backup = BackupManager::new(paths.clone()).create_backup()?;
//!
//! let result = RestoreManager::new(paths).restore(&backup.name)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;
pub mod usage;

pub use manager::{BackupInfo, BackupManager, MANIFEST_FILE};
pub use restore::{RestoreManager, RestoreResult};
pub use usage::{directory_size, directory_tree};
