//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::error::{RegistrarError, RegistrarResult};
use crate::export::{
    default_export_path, export_courses_csv, export_enrollments_csv, export_full_json,
    export_full_yaml, export_students_csv, export_to_file, import_from_json, import_from_yaml,
};
use crate::storage::Storage;

/// Full-database export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export students to CSV
    Students {
        /// Output file (default: exports/students_<timestamp>.csv)
        output: Option<PathBuf>,
    },
    /// Export courses to CSV
    Courses {
        /// Output file (default: exports/courses_<timestamp>.csv)
        output: Option<PathBuf>,
    },
    /// Export enrollments and grades to CSV
    Enrollments {
        /// Output file (default: exports/enrollments_<timestamp>.csv)
        output: Option<PathBuf>,
    },
    /// Export the whole database
    All {
        /// Output file path
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Check that a JSON or YAML export file is complete and consistent
    Verify {
        /// Export file (.json, .yaml or .yml)
        file: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> RegistrarResult<()> {
    let paths = storage.paths();

    match cmd {
        ExportCommands::Students { output } => {
            let path = output.unwrap_or_else(|| default_export_path(paths, "students"));
            let rows = export_to_file(&path, |file| export_students_csv(storage, file))?;
            println!("Exported {} student(s) to: {}", rows, path.display());
        }

        ExportCommands::Courses { output } => {
            let path = output.unwrap_or_else(|| default_export_path(paths, "courses"));
            let rows = export_to_file(&path, |file| export_courses_csv(storage, file))?;
            println!("Exported {} course(s) to: {}", rows, path.display());
        }

        ExportCommands::Enrollments { output } => {
            let path = output.unwrap_or_else(|| default_export_path(paths, "enrollments"));
            let rows = export_to_file(&path, |file| export_enrollments_csv(storage, file))?;
            println!("Exported {} enrollment(s) to: {}", rows, path.display());
        }

        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let file = File::create(&output).map_err(|e| {
                RegistrarError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);

            match format {
                ExportFormat::Json => export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
            }
            writer
                .flush()
                .map_err(|e| RegistrarError::Export(e.to_string()))?;
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Verify { file } => {
            let contents = std::fs::read_to_string(&file).map_err(|e| {
                RegistrarError::Import(format!("Failed to read {}: {}", file.display(), e))
            })?;
            let is_yaml = file
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            let export = if is_yaml {
                import_from_yaml(&contents)?
            } else {
                import_from_json(&contents)?
            };

            println!("Export is valid: {}", file.display());
            println!("  Exported:    {}", export.exported_at);
            println!("  Students:    {}", export.metadata.student_count);
            println!("  Courses:     {}", export.metadata.course_count);
            println!(
                "  Enrollments: {} ({} graded)",
                export.metadata.enrollment_count, export.metadata.graded_count
            );
        }
    }

    Ok(())
}
