use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use registrar::cli::{
    handle_audit_command, handle_backup_command, handle_course_command, handle_enroll_command,
    handle_export_command, handle_grade_command, handle_import_command, handle_report_command,
    handle_student_command, handle_transcript_command, Menu,
};
use registrar::config::{paths::RegistrarPaths, settings::Settings};
use registrar::storage::{initialize_storage, Storage};

/// Environment variable holding a `tracing` filter directive
const LOG_ENV: &str = "REGISTRAR_LOG";

#[derive(Parser)]
#[command(
    name = "registrar",
    version,
    about = "Terminal-based academic records manager",
    long_about = "Registrar keeps students, courses, enrollments and grades, \
                  enforces enrollment rules and per-semester credit limits, \
                  and produces transcripts, GPA reports and backups."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Student management commands
    #[command(subcommand)]
    Student(registrar::cli::StudentCommands),

    /// Course catalogue commands
    #[command(subcommand)]
    Course(registrar::cli::CourseCommands),

    /// Enroll, drop and list enrollments
    #[command(subcommand)]
    Enroll(registrar::cli::EnrollCommands),

    /// Record marks for an enrollment
    Grade(registrar::cli::GradeArgs),

    /// Print a student's transcript
    Transcript(registrar::cli::TranscriptArgs),

    /// Generate reports
    #[command(subcommand)]
    Report(registrar::cli::ReportCommands),

    /// Import students or courses from CSV
    #[command(subcommand)]
    Import(registrar::cli::ImportCommands),

    /// Export data to CSV, JSON or YAML
    #[command(subcommand)]
    Export(registrar::cli::ExportCommands),

    /// Backup management and disk usage
    #[command(subcommand)]
    Backup(registrar::cli::BackupCommands),

    /// Show the audit log
    Audit(registrar::cli::AuditArgs),

    /// Launch the interactive menu
    Menu,

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("registrar={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = RegistrarPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Student(cmd)) => handle_student_command(&storage, cmd)?,
        Some(Commands::Course(cmd)) => handle_course_command(&storage, &settings, cmd)?,
        Some(Commands::Enroll(cmd)) => handle_enroll_command(&storage, &settings, cmd)?,
        Some(Commands::Grade(args)) => handle_grade_command(&storage, &settings, args)?,
        Some(Commands::Transcript(args)) => handle_transcript_command(&storage, args)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Import(cmd)) => handle_import_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        Some(Commands::Menu) => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(&storage, &settings, stdin.lock(), stdout.lock()).run()?;
        }
        Some(Commands::Init) => {
            println!("Initializing Registrar at: {}", paths.base_dir().display());
            initialize_storage(&paths, &settings)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  registrar student add <ID> <REG_NO> <FIRST> <LAST>");
            println!("  registrar course add <CODE> <TITLE> --credits 4 --semester fall");
            println!("  registrar menu");
        }
        Some(Commands::Config) => {
            println!("Registrar Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.exports_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Institution:              {}", settings.institution_name);
            println!("  Max credits per semester: {}", settings.max_credits_per_semester);
            println!("  Max course credits:       {}", settings.max_course_credits);
            println!("  Backups kept by prune:    {}", settings.backup_retention.keep_count);
            println!("  Top students shown:       {}", settings.top_students_limit);
        }
        None => {
            println!("Registrar - Terminal-based academic records manager");
            println!();
            println!("Run 'registrar --help' for usage information.");
            println!("Run 'registrar menu' for the interactive menu.");
        }
    }

    Ok(())
}
