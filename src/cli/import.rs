//! CLI command handler for CSV import

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{RegistrarError, RegistrarResult};
use crate::services::{ImportResult, ImportService};
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand, Debug)]
pub enum ImportCommands {
    /// Import students: id, reg_no, first_name, last_name[, email]
    Students {
        /// Path to CSV file with a header row
        file: PathBuf,
    },
    /// Import courses: code, title, credits, instructor, department, semester
    Courses {
        /// Path to CSV file with a header row
        file: PathBuf,
    },
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ImportCommands,
) -> RegistrarResult<()> {
    let service = ImportService::from_settings(storage, settings);

    let (kind, file) = match &cmd {
        ImportCommands::Students { file } => ("students", file),
        ImportCommands::Courses { file } => ("courses", file),
    };
    if !file.exists() {
        return Err(RegistrarError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let result = match &cmd {
        ImportCommands::Students { file } => service.import_students(file)?,
        ImportCommands::Courses { file } => service.import_courses(file)?,
    };

    print_result(kind, &result);
    Ok(())
}

fn print_result(kind: &str, result: &ImportResult) {
    println!("Import of {} complete", kind);
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Rejected: {}", result.rejected);
    for (line, message) in &result.messages {
        println!("    Line {}: {}", line, message);
    }
}
