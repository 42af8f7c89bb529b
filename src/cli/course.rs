//! Course CLI commands

use clap::Subcommand;

use crate::cli::parse_semester;
use crate::config::Settings;
use crate::display::{format_course_details, format_course_list};
use crate::error::RegistrarResult;
use crate::services::{CourseSearch, CourseService, CourseUpdate, EnrollmentService, NewCourse};
use crate::storage::Storage;

/// Course subcommands
#[derive(Subcommand)]
pub enum CourseCommands {
    /// Add a course to the catalogue
    Add {
        /// Course code, e.g. CS101
        code: String,
        /// Course title
        title: String,
        /// Credits (default 3)
        #[arg(short, long)]
        credits: Option<u32>,
        #[arg(short, long, default_value = "")]
        instructor: String,
        #[arg(short, long, default_value = "")]
        department: String,
        /// Semester (spring, summer, fall; default spring)
        #[arg(short, long)]
        semester: Option<String>,
    },
    /// List courses
    List {
        /// Include inactive courses
        #[arg(short, long)]
        all: bool,
    },
    /// Show a course's details
    Show {
        /// Course code
        code: String,
    },
    /// Search the catalogue
    Search {
        /// Part of the department name
        #[arg(short, long)]
        department: Option<String>,
        /// Part of the instructor name
        #[arg(short, long)]
        instructor: Option<String>,
        #[arg(short, long)]
        semester: Option<String>,
        /// Minimum credits (inclusive)
        #[arg(long)]
        min_credits: Option<u32>,
        /// Maximum credits (inclusive)
        #[arg(long)]
        max_credits: Option<u32>,
        /// Include inactive courses
        #[arg(short, long)]
        all: bool,
    },
    /// Edit a course
    Update {
        /// Course code
        code: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        credits: Option<u32>,
        #[arg(short, long)]
        instructor: Option<String>,
        #[arg(short, long)]
        department: Option<String>,
        #[arg(short, long)]
        semester: Option<String>,
    },
    /// Stop a course from accepting enrollments
    Deactivate {
        /// Course code
        code: String,
    },
}

/// Handle a course command
pub fn handle_course_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CourseCommands,
) -> RegistrarResult<()> {
    let service = CourseService::from_settings(storage, settings);

    match cmd {
        CourseCommands::Add {
            code,
            title,
            credits,
            instructor,
            department,
            semester,
        } => {
            let course = service.add(NewCourse {
                code,
                title,
                credits,
                instructor,
                department,
                semester: semester.as_deref().map(parse_semester).transpose()?,
            })?;
            println!("Added course: {}", course);
            println!("  Credits:  {}", course.credits);
            println!("  Semester: {}", course.semester);
        }

        CourseCommands::List { all } => {
            print!("{}", format_course_list(&service.list(all)?));
        }

        CourseCommands::Show { code } => {
            let course = service.require(&code)?;
            let count = EnrollmentService::from_settings(storage, settings)
                .course_enrollment_count(&code)?;
            print!("{}", format_course_details(&course, count));
        }

        CourseCommands::Search {
            department,
            instructor,
            semester,
            min_credits,
            max_credits,
            all,
        } => {
            let criteria = CourseSearch {
                department,
                instructor,
                semester: semester.as_deref().map(parse_semester).transpose()?,
                min_credits,
                max_credits,
                include_inactive: all,
            };
            print!("{}", format_course_list(&service.search(&criteria)?));
        }

        CourseCommands::Update {
            code,
            title,
            credits,
            instructor,
            department,
            semester,
        } => {
            let changes = CourseUpdate {
                title,
                credits,
                instructor,
                department,
                semester: semester.as_deref().map(parse_semester).transpose()?,
            };
            if changes.title.is_none()
                && changes.credits.is_none()
                && changes.instructor.is_none()
                && changes.department.is_none()
                && changes.semester.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(&code, changes)?;
            println!("Updated course: {}", updated);
        }

        CourseCommands::Deactivate { code } => {
            let course = service.deactivate(&code)?;
            println!("Deactivated course: {}", course);
        }
    }

    Ok(())
}
