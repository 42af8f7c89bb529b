//! CLI commands for reports
//!
//! Prints reports to the terminal or exports them as CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{RegistrarError, RegistrarResult};
use crate::reports::{EnrollmentStatsReport, GpaDistributionReport, TopStudentsReport};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Rank active students by GPA
    #[command(alias = "top")]
    TopStudents {
        /// Number of students to show (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count active students per GPA band
    #[command(alias = "distribution")]
    Gpa,

    /// Enrollment counts per course and per semester
    Enrollments {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn create_output(path: &Path) -> RegistrarResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        RegistrarError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> RegistrarResult<()> {
    match cmd {
        ReportCommands::TopStudents { limit, output } => {
            let limit = limit.unwrap_or(settings.top_students_limit);
            let report = TopStudentsReport::generate(storage, limit)?;
            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Top students report exported to: {}", path.display());
            } else {
                print!("{}", report.format_terminal());
            }
        }

        ReportCommands::Gpa => {
            let report = GpaDistributionReport::generate(storage)?;
            print!("{}", report.format_terminal());
        }

        ReportCommands::Enrollments { output } => {
            let report = EnrollmentStatsReport::generate(storage)?;
            if let Some(path) = output {
                report.export_csv(create_output(&path)?)?;
                println!("Enrollment report exported to: {}", path.display());
            } else {
                print!("{}", report.format_terminal());
            }
        }
    }

    Ok(())
}
