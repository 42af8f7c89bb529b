//! Storage initialization
//!
//! Handles first-run setup: directory layout and empty registry files.

use crate::config::paths::RegistrarPaths;
use crate::config::settings::Settings;
use crate::error::RegistrarResult;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Existing registry files and settings are left untouched, so running this
/// twice is harmless.
pub fn initialize_storage(paths: &RegistrarPaths, settings: &Settings) -> RegistrarResult<()> {
    paths.ensure_directories()?;

    if !paths.is_initialized() {
        settings.save(paths)?;
    }

    // Writing an empty registry only touches files that do not exist yet
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    for file in paths.data_files() {
        if !file.exists() {
            storage.save_all()?;
            break;
        }
    }

    tracing::info!(base_dir = %paths.base_dir().display(), "storage initialized");
    Ok(())
}
