//! Student CLI commands

use clap::Subcommand;

use crate::cli::parse_status;
use crate::display::{format_enrollment_list, format_student_details, format_student_list};
use crate::error::RegistrarResult;
use crate::services::{NewStudent, StudentService, StudentUpdate};
use crate::storage::Storage;

/// Student subcommands
#[derive(Subcommand)]
pub enum StudentCommands {
    /// Register a new student
    Add {
        /// Student ID (3-20 letters or digits)
        id: String,
        /// Registration number
        reg_no: String,
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List students
    List {
        /// Include inactive, graduated and suspended students
        #[arg(short, long)]
        all: bool,
    },
    /// Show a student's details and enrollments
    Show {
        /// Student ID or registration number
        student: String,
    },
    /// Search students by name and/or status
    Search {
        /// Part of the full name (case-insensitive)
        #[arg(short, long)]
        name: Option<String>,
        /// Status (active, inactive, graduated, suspended)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Edit a student
    Update {
        /// Student ID or registration number
        student: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// New email; pass an empty string to clear it
        #[arg(short, long)]
        email: Option<String>,
        /// New status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Mark a student inactive
    Deactivate {
        /// Student ID or registration number
        student: String,
    },
    /// Show counts by status
    Stats,
}

/// Handle a student command
pub fn handle_student_command(storage: &Storage, cmd: StudentCommands) -> RegistrarResult<()> {
    let service = StudentService::new(storage);

    match cmd {
        StudentCommands::Add {
            id,
            reg_no,
            first_name,
            last_name,
            email,
        } => {
            let student = service.add(NewStudent {
                id,
                reg_no,
                first_name,
                last_name,
                email,
            })?;
            println!("Added student: {}", student.name);
            println!("  ID:      {}", student.id);
            println!("  Reg. No: {}", student.reg_no);
        }

        StudentCommands::List { all } => {
            print!("{}", format_student_list(&service.list(all)?));
        }

        StudentCommands::Show { student } => {
            let found = service.require(&student)?;
            print!("{}", format_student_details(&found));

            let enrollments =
                storage.enrollments.get_by_student(&found.id)?;
            if !enrollments.is_empty() {
                println!();
                print!("{}", format_enrollment_list(&enrollments));
            }
        }

        StudentCommands::Search { name, status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let found = service.search(name.as_deref(), status)?;
            print!("{}", format_student_list(&found));
        }

        StudentCommands::Update {
            student,
            first_name,
            last_name,
            email,
            status,
        } => {
            let changes = StudentUpdate {
                first_name,
                last_name,
                email,
                status: status.as_deref().map(parse_status).transpose()?,
            };
            if changes.first_name.is_none()
                && changes.last_name.is_none()
                && changes.email.is_none()
                && changes.status.is_none()
            {
                println!("No changes specified. Use --first-name, --last-name, --email or --status.");
                return Ok(());
            }

            let updated = service.update(&student, changes)?;
            println!("Updated student: {}", updated);
        }

        StudentCommands::Deactivate { student } => {
            let deactivated = service.deactivate(&student)?;
            println!("Deactivated student: {}", deactivated.display_name());
        }

        StudentCommands::Stats => {
            let stats = service.stats()?;
            println!("Students");
            println!("  Total:    {}", stats.total);
            println!("  Active:   {}", stats.active);
            println!("  Inactive: {}", stats.inactive);
        }
    }

    Ok(())
}
