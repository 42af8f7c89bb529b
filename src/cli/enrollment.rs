//! Enrollment, grading and transcript CLI commands

use clap::{Args, Subcommand};

use crate::cli::parse_semester;
use crate::config::Settings;
use crate::display::{format_enrollment_list, format_transcript};
use crate::error::{RegistrarError, RegistrarResult};
use crate::services::{EnrollmentService, TranscriptService};
use crate::storage::Storage;

/// Enrollment subcommands
#[derive(Subcommand)]
pub enum EnrollCommands {
    /// Enroll a student in a course
    Add {
        /// Student ID
        student: String,
        /// Course code
        course: String,
    },
    /// Remove a student from a course
    #[command(alias = "unenroll")]
    Drop {
        /// Student ID
        student: String,
        /// Course code
        course: String,
    },
    /// List enrollments of a student or a course
    List {
        #[arg(short, long, conflicts_with = "course")]
        student: Option<String>,
        #[arg(short, long)]
        course: Option<String>,
    },
    /// Enrollment counts per semester
    Stats,
}

/// Arguments of `grade`
#[derive(Args)]
pub struct GradeArgs {
    /// Student ID
    pub student: String,
    /// Course code
    pub course: String,
    /// Marks out of 100
    pub marks: f64,
}

/// Arguments of `transcript`
#[derive(Args)]
pub struct TranscriptArgs {
    /// Student ID
    pub student: String,
    /// Only print the GPA of one semester
    #[arg(short, long)]
    pub semester: Option<String>,
}

/// Handle an enrollment command
pub fn handle_enroll_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EnrollCommands,
) -> RegistrarResult<()> {
    let service = EnrollmentService::from_settings(storage, settings);

    match cmd {
        EnrollCommands::Add { student, course } => {
            let enrollment = service.enroll(&student, &course)?;
            println!(
                "Enrolled {} in {}",
                enrollment.student_id, enrollment.course_code
            );
            if let Some(found) = storage.courses.get(&enrollment.course_code)? {
                let used = service.semester_credits(&enrollment.student_id, found.semester)?;
                println!(
                    "  {} credits: {}/{}",
                    found.semester,
                    used,
                    service.credit_limit()
                );
            }
        }

        EnrollCommands::Drop { student, course } => {
            let removed = service.unenroll(&student, &course)?;
            println!("Dropped {} from {}", removed.student_id, removed.course_code);
        }

        EnrollCommands::List { student, course } => {
            let enrollments = match (student, course) {
                (Some(student), _) => service.enrollments_for_student(&student)?,
                (None, Some(course)) => service.enrollments_for_course(&course)?,
                (None, None) => storage.enrollments.get_all()?,
            };
            print!("{}", format_enrollment_list(&enrollments));
        }

        EnrollCommands::Stats => {
            println!("Enrollments per semester");
            for (semester, count) in service.stats_by_semester()? {
                println!("  {:<8} {}", semester, count);
            }
        }
    }

    Ok(())
}

/// Handle the grade command
pub fn handle_grade_command(
    storage: &Storage,
    settings: &Settings,
    args: GradeArgs,
) -> RegistrarResult<()> {
    let enrollment = EnrollmentService::from_settings(storage, settings)
        .record_grade(&args.student, &args.course, args.marks)?;
    let grade = enrollment
        .letter_grade()
        .ok_or_else(|| RegistrarError::Storage("grade was not stored".to_string()))?;

    println!(
        "Recorded {:.1} marks for {} in {}: {}",
        args.marks, enrollment.student_id, enrollment.course_code, grade
    );
    Ok(())
}

/// Handle the transcript command
pub fn handle_transcript_command(storage: &Storage, args: TranscriptArgs) -> RegistrarResult<()> {
    let service = TranscriptService::new(storage);

    match args.semester {
        Some(semester) => {
            let semester = parse_semester(&semester)?;
            let gpa = service.calculate_semester_gpa(&args.student, semester)?;
            println!("{} GPA for {}: {:.2}", semester, args.student.trim(), gpa);
        }
        None => {
            let transcript = service.generate(&args.student)?;
            print!("{}", format_transcript(&transcript));
        }
    }

    Ok(())
}
