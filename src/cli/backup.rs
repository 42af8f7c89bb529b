//! Backup CLI commands
//!
//! Implements CLI commands for backup management and disk usage.

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{directory_size, directory_tree, BackupManager, RestoreManager};
use crate::config::paths::RegistrarPaths;
use crate::config::settings::Settings;
use crate::error::{RegistrarError, RegistrarResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create,

    /// List all available backups
    List,

    /// Restore data from a backup
    Restore {
        /// Backup name (use 'latest' for the most recent)
        backup: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Delete all but the newest backups
    Prune {
        /// Number of backups to keep (defaults to the configured retention)
        #[arg(short, long)]
        keep: Option<usize>,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show disk usage of the data, exports and backup directories
    Size,

    /// Print a directory tree (defaults to the base directory)
    Tree {
        path: Option<PathBuf>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &RegistrarPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> RegistrarResult<()> {
    let manager = BackupManager::new(paths.clone());

    match cmd {
        BackupCommands::Create => {
            let backup = manager.create_backup()?;
            println!("Backup created: {}", backup.name);
            println!("Location: {}", backup.path.display());
            println!("Size: {}", format_size(backup.size_bytes));
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: registrar backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            for (i, backup) in backups.iter().enumerate() {
                println!(
                    "  {}. {} ({}, {})",
                    i + 1,
                    backup.name,
                    backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    format_size(backup.size_bytes),
                );
            }
            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let name = if backup.eq_ignore_ascii_case("latest") {
                manager
                    .get_latest_backup()?
                    .map(|b| b.name)
                    .ok_or_else(|| RegistrarError::backup_not_found("latest"))?
            } else {
                manager
                    .get_backup(&backup)?
                    .map(|b| b.name)
                    .ok_or_else(|| RegistrarError::backup_not_found(&backup))?
            };

            if !force {
                println!("WARNING: This will overwrite all current data with {}!", name);
                println!("To proceed, run again with --force:");
                println!("  registrar backup restore {} --force", backup);
                return Ok(());
            }

            let safety = manager.create_backup()?;
            println!("Current data saved to: {}", safety.name);

            let result = RestoreManager::new(paths.clone()).restore(&name)?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune { keep, force } => {
            let keep = keep.unwrap_or(settings.backup_retention.keep_count as usize);
            let backups = manager.list_backups()?;
            let excess = backups.len().saturating_sub(keep);

            if excess == 0 {
                println!(
                    "No backups to prune ({} present, keeping {}).",
                    backups.len(),
                    keep
                );
                return Ok(());
            }

            if !force {
                println!("{} backup(s) would be deleted, keeping the newest {}:", excess, keep);
                for backup in backups.iter().skip(keep) {
                    println!("  {}", backup.name);
                }
                println!("To delete them, run again with --force");
                return Ok(());
            }

            let deleted = manager.prune(keep)?;
            println!("Deleted {} backup(s).", deleted.len());
        }

        BackupCommands::Size => {
            println!("Disk usage");
            for (label, dir) in [
                ("Data", paths.data_dir()),
                ("Exports", paths.exports_dir()),
                ("Backups", paths.backup_dir()),
            ] {
                println!("  {:<8} {:>10}  {}", label, format_size(directory_size(&dir)), dir.display());
            }
            println!(
                "  {:<8} {:>10}  {}",
                "Total",
                format_size(directory_size(paths.base_dir())),
                paths.base_dir().display()
            );
        }

        BackupCommands::Tree { path } => {
            let root = path.unwrap_or_else(|| paths.base_dir().clone());
            if !root.exists() {
                return Err(RegistrarError::Io(format!(
                    "No such directory: {}",
                    root.display()
                )));
            }
            print!("{}", directory_tree(&root));
        }
    }

    Ok(())
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
