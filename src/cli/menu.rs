//! Interactive numbered menu
//!
//! Reads choices line by line from any `BufRead` and writes to any `Write`,
//! so the whole loop runs the same against a terminal or an in-memory
//! buffer. Domain errors are printed and the menu carries on; end of input
//! leaves the menu cleanly.

use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::backup::{directory_size, BackupManager};
use crate::cli::parse_semester;
use crate::config::Settings;
use crate::display::{
    format_course_details, format_course_list, format_enrollment_list, format_student_details,
    format_student_list, format_transcript,
};
use crate::error::{RegistrarError, RegistrarResult};
use crate::export::{default_export_path, export_courses_csv, export_students_csv, export_to_file};
use crate::reports::{EnrollmentStatsReport, GpaDistributionReport, TopStudentsReport};
use crate::services::{
    CourseSearch, CourseService, EnrollmentService, ImportResult, ImportService, NewCourse,
    NewStudent, StudentService, TranscriptService,
};
use crate::storage::Storage;

const MAIN_OPTIONS: [&str; 7] = [
    "Students",
    "Courses",
    "Enrollments",
    "Grades & transcripts",
    "File operations",
    "Reports",
    "Exit",
];

const STUDENT_OPTIONS: [&str; 6] = [
    "Add student",
    "List students",
    "Find student",
    "Search by name",
    "Deactivate student",
    "Student statistics",
];

const COURSE_OPTIONS: [&str; 5] = [
    "Add course",
    "List courses",
    "Find course",
    "Search by department",
    "Deactivate course",
];

const ENROLLMENT_OPTIONS: [&str; 5] = [
    "Enroll student",
    "Unenroll student",
    "Enrollments of a student",
    "Enrollments of a course",
    "Enrollments per semester",
];

const GRADE_OPTIONS: [&str; 3] = ["Record grade", "Show transcript", "Show GPA"];

const FILE_OPTIONS: [&str; 7] = [
    "Import students from CSV",
    "Import courses from CSV",
    "Export students to CSV",
    "Export courses to CSV",
    "Create backup",
    "List backups",
    "Show disk usage",
];

const REPORT_OPTIONS: [&str; 4] = [
    "Top students",
    "GPA distribution",
    "Course enrollment statistics",
    "Recent audit entries",
];

type Action<M> = fn(&mut M, &str) -> RegistrarResult<bool>;

/// The interactive menu loop
pub struct Menu<'a, R, W> {
    storage: &'a Storage,
    settings: &'a Settings,
    input: R,
    output: W,
    at_eof: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            storage,
            settings,
            input,
            output,
            at_eof: false,
        }
    }

    /// Run until the user picks Exit or input ends
    pub fn run(&mut self) -> RegistrarResult<()> {
        writeln!(self.output, "{}", self.settings.institution_name)?;

        loop {
            self.print_options("Main Menu", &MAIN_OPTIONS, false)?;
            let choice = match self.ask("Choose an option: ") {
                Ok(choice) => choice,
                Err(_) if self.at_eof => break,
                Err(e) => return Err(e),
            };

            match choice.as_str() {
                "1" => self.sub_menu("Students", &STUDENT_OPTIONS, Self::student_action)?,
                "2" => self.sub_menu("Courses", &COURSE_OPTIONS, Self::course_action)?,
                "3" => self.sub_menu("Enrollments", &ENROLLMENT_OPTIONS, Self::enrollment_action)?,
                "4" => self.sub_menu("Grades", &GRADE_OPTIONS, Self::grade_action)?,
                "5" => self.sub_menu("File Operations", &FILE_OPTIONS, Self::file_action)?,
                "6" => self.sub_menu("Reports", &REPORT_OPTIONS, Self::report_action)?,
                "7" => break,
                other => writeln!(self.output, "Invalid option: {}", other)?,
            }

            if self.at_eof {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    fn print_options(&mut self, title: &str, options: &[&str], back: bool) -> RegistrarResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "== {} ==", title)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, option)?;
        }
        if back {
            writeln!(self.output, "  0. Back")?;
        }
        Ok(())
    }

    fn sub_menu(&mut self, title: &str, options: &[&str], action: Action<Self>) -> RegistrarResult<()> {
        loop {
            self.print_options(title, options, true)?;
            let choice = match self.ask("Choose an option: ") {
                Ok(choice) => choice,
                Err(_) if self.at_eof => return Ok(()),
                Err(e) => return Err(e),
            };
            if choice == "0" {
                return Ok(());
            }

            match action(self, &choice) {
                Ok(true) => {}
                Ok(false) => writeln!(self.output, "Invalid option: {}", choice)?,
                Err(_) if self.at_eof => return Ok(()),
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }
    }

    /// Prompt and read one trimmed line; end of input is an error that also
    /// sets `at_eof`
    fn ask(&mut self, label: &str) -> RegistrarResult<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.at_eof = true;
            writeln!(self.output)?;
            return Err(RegistrarError::Io("end of input".to_string()));
        }
        Ok(line.trim().to_string())
    }

    /// Like `ask`, with a blank answer meaning "not given"
    fn ask_optional(&mut self, label: &str) -> RegistrarResult<Option<String>> {
        let answer = self.ask(label)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    fn ask_number<T: FromStr>(&mut self, label: &str) -> RegistrarResult<T> {
        let answer = self.ask(label)?;
        answer
            .parse()
            .map_err(|_| RegistrarError::Validation(format!("'{}' is not a valid number", answer)))
    }

    fn student_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        let service = StudentService::new(self.storage);

        match choice {
            "1" => {
                let input = NewStudent {
                    id: self.ask("Student ID: ")?,
                    reg_no: self.ask("Registration number: ")?,
                    first_name: self.ask("First name: ")?,
                    last_name: self.ask("Last name: ")?,
                    email: self.ask_optional("Email (optional): ")?,
                };
                let student = service.add(input)?;
                writeln!(self.output, "Added student: {}", student.display_name())?;
            }
            "2" => write!(self.output, "{}", format_student_list(&service.list(true)?))?,
            "3" => {
                let identifier = self.ask("Student ID or registration number: ")?;
                let student = service.require(&identifier)?;
                write!(self.output, "{}", format_student_details(&student))?;
            }
            "4" => {
                let pattern = self.ask("Name contains: ")?;
                let found = service.search(Some(&pattern), None)?;
                write!(self.output, "{}", format_student_list(&found))?;
            }
            "5" => {
                let identifier = self.ask("Student ID: ")?;
                let student = service.deactivate(&identifier)?;
                writeln!(self.output, "Deactivated student: {}", student.display_name())?;
            }
            "6" => {
                let stats = service.stats()?;
                writeln!(
                    self.output,
                    "Total: {}  Active: {}  Inactive: {}",
                    stats.total, stats.active, stats.inactive
                )?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn course_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        let service = CourseService::from_settings(self.storage, self.settings);

        match choice {
            "1" => {
                let code = self.ask("Course code: ")?;
                let title = self.ask("Title: ")?;
                let credits = match self.ask_optional("Credits [3]: ")? {
                    Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                        RegistrarError::Validation(format!("'{}' is not a valid number", raw))
                    })?),
                    None => None,
                };
                let instructor = self.ask("Instructor: ")?;
                let department = self.ask("Department: ")?;
                let semester = self
                    .ask_optional("Semester (spring/summer/fall) [spring]: ")?
                    .map(|s| parse_semester(&s))
                    .transpose()?;

                let course = service.add(NewCourse {
                    code,
                    title,
                    credits,
                    instructor,
                    department,
                    semester,
                })?;
                writeln!(self.output, "Added course: {}", course)?;
            }
            "2" => write!(self.output, "{}", format_course_list(&service.list(true)?))?,
            "3" => {
                let code = self.ask("Course code: ")?;
                let course = service.require(&code)?;
                let count = EnrollmentService::from_settings(self.storage, self.settings)
                    .course_enrollment_count(&code)?;
                write!(self.output, "{}", format_course_details(&course, count))?;
            }
            "4" => {
                let department = self.ask("Department contains: ")?;
                let found = service.search(&CourseSearch {
                    department: Some(department),
                    ..CourseSearch::default()
                })?;
                write!(self.output, "{}", format_course_list(&found))?;
            }
            "5" => {
                let code = self.ask("Course code: ")?;
                let course = service.deactivate(&code)?;
                writeln!(self.output, "Deactivated course: {}", course)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn enrollment_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        let service = EnrollmentService::from_settings(self.storage, self.settings);

        match choice {
            "1" => {
                let student = self.ask("Student ID: ")?;
                let course = self.ask("Course code: ")?;
                let enrollment = service.enroll(&student, &course)?;
                writeln!(
                    self.output,
                    "Enrolled {} in {}",
                    enrollment.student_id, enrollment.course_code
                )?;
            }
            "2" => {
                let student = self.ask("Student ID: ")?;
                let course = self.ask("Course code: ")?;
                let removed = service.unenroll(&student, &course)?;
                writeln!(
                    self.output,
                    "Unenrolled {} from {}",
                    removed.student_id, removed.course_code
                )?;
            }
            "3" => {
                let student = self.ask("Student ID: ")?;
                let enrollments = service.enrollments_for_student(&student)?;
                write!(self.output, "{}", format_enrollment_list(&enrollments))?;
            }
            "4" => {
                let course = self.ask("Course code: ")?;
                let enrollments = service.enrollments_for_course(&course)?;
                write!(self.output, "{}", format_enrollment_list(&enrollments))?;
            }
            "5" => {
                for (semester, count) in service.stats_by_semester()? {
                    writeln!(self.output, "  {:<8} {}", semester, count)?;
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn grade_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        let transcripts = TranscriptService::new(self.storage);

        match choice {
            "1" => {
                let student = self.ask("Student ID: ")?;
                let course = self.ask("Course code: ")?;
                let marks: f64 = self.ask_number("Marks (0-100): ")?;
                let enrollment = EnrollmentService::from_settings(self.storage, self.settings)
                    .record_grade(&student, &course, marks)?;
                if let Some(grade) = enrollment.letter_grade() {
                    writeln!(self.output, "Recorded grade {}", grade)?;
                }
            }
            "2" => {
                let student = self.ask("Student ID: ")?;
                let transcript = transcripts.generate(&student)?;
                write!(self.output, "{}", format_transcript(&transcript))?;
            }
            "3" => {
                let student = self.ask("Student ID: ")?;
                let gpa = transcripts.calculate_gpa(&student)?;
                writeln!(self.output, "GPA: {:.2}", gpa)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn file_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        let storage = self.storage;
        let importer = ImportService::from_settings(storage, self.settings);
        let paths = storage.paths();

        match choice {
            "1" => {
                let file = self.ask("CSV file: ")?;
                let result = importer.import_students(Path::new(&file))?;
                self.print_import(&result)?;
            }
            "2" => {
                let file = self.ask("CSV file: ")?;
                let result = importer.import_courses(Path::new(&file))?;
                self.print_import(&result)?;
            }
            "3" => {
                let path = default_export_path(paths, "students");
                let rows = export_to_file(&path, |file| export_students_csv(storage, file))?;
                writeln!(self.output, "Exported {} student(s) to {}", rows, path.display())?;
            }
            "4" => {
                let path = default_export_path(paths, "courses");
                let rows = export_to_file(&path, |file| export_courses_csv(storage, file))?;
                writeln!(self.output, "Exported {} course(s) to {}", rows, path.display())?;
            }
            "5" => {
                let backup = BackupManager::new(paths.clone()).create_backup()?;
                writeln!(self.output, "Backup created: {}", backup.name)?;
            }
            "6" => {
                let backups = BackupManager::new(paths.clone()).list_backups()?;
                if backups.is_empty() {
                    writeln!(self.output, "No backups found.")?;
                }
                for backup in backups {
                    writeln!(self.output, "  {} ({} bytes)", backup.name, backup.size_bytes)?;
                }
            }
            "7" => {
                let bytes = directory_size(paths.base_dir());
                writeln!(self.output, "{}: {} bytes", paths.base_dir().display(), bytes)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn print_import(&mut self, result: &ImportResult) -> RegistrarResult<()> {
        writeln!(
            self.output,
            "Imported {}, skipped {}, rejected {}",
            result.imported, result.skipped, result.rejected
        )?;
        for (line, message) in &result.messages {
            writeln!(self.output, "  Line {}: {}", line, message)?;
        }
        Ok(())
    }

    fn report_action(&mut self, choice: &str) -> RegistrarResult<bool> {
        match choice {
            "1" => {
                let report = TopStudentsReport::generate(self.storage, self.settings.top_students_limit)?;
                write!(self.output, "{}", report.format_terminal())?;
            }
            "2" => {
                let report = GpaDistributionReport::generate(self.storage)?;
                write!(self.output, "{}", report.format_terminal())?;
            }
            "3" => {
                let report = EnrollmentStatsReport::generate(self.storage)?;
                write!(self.output, "{}", report.format_terminal())?;
            }
            "4" => {
                for entry in self.storage.audit().read_recent(10)? {
                    writeln!(self.output, "{}", entry.format_human_readable())?;
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentId;
    use crate::testing::{empty_storage, seeded_storage};
    use std::io::Cursor;

    fn run(storage: &Storage, script: &str) -> String {
        let settings = Settings::default();
        let mut output = Vec::new();
        Menu::new(storage, &settings, Cursor::new(script), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit() {
        let (_temp, storage) = empty_storage();
        let output = run(&storage, "7\n");
        assert!(output.contains("== Main Menu =="));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let (_temp, storage) = empty_storage();
        assert!(run(&storage, "").contains("Goodbye!"));
        assert!(run(&storage, "1\n").contains("Goodbye!"));
    }

    #[test]
    fn test_eof_mid_action_adds_nothing() {
        let (_temp, storage) = empty_storage();
        let output = run(&storage, "1\n1\nS1001\nREG-1\n");
        assert!(output.contains("Goodbye!"));
        assert!(!output.contains("Error"));
        assert_eq!(storage.students.count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_list_student() {
        let (_temp, storage) = empty_storage();
        let output = run(&storage, "1\n1\nS1001\nREG-1\nAda\nLovelace\n\n2\n0\n7\n");

        assert!(output.contains("Added student: Ada Lovelace (REG-1)"));
        assert!(output.contains("1 student(s)"));
        let ada = storage.students.get(&StudentId::new("S1001")).unwrap().unwrap();
        assert!(ada.email.is_none());
    }

    #[test]
    fn test_errors_are_reported_and_menu_continues() {
        let (_temp, storage) = seeded_storage();
        let output = run(&storage, "3\n1\nS9999\nCS101\n1\nS1001\nCS101\n0\n7\n");

        assert!(output.contains("Error: Student not found: S9999"));
        assert!(output.contains("Error: Student 'S1001' is already enrolled in course 'CS101'"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_invalid_options() {
        let (_temp, storage) = empty_storage();
        let output = run(&storage, "9\n2\n42\n0\n7\n");
        assert!(output.contains("Invalid option: 9"));
        assert!(output.contains("Invalid option: 42"));
    }

    #[test]
    fn test_grades_and_reports() {
        let (_temp, storage) = seeded_storage();
        let output = run(&storage, "4\n1\nS1003\nCS101\n88\n3\nS1003\n0\n6\n1\n0\n7\n");

        assert!(output.contains("Recorded grade A (Excellent)"));
        assert!(output.contains("GPA: 9.00"));
        assert!(output.contains("Grace Hopper"));
    }

    #[test]
    fn test_bad_marks_are_rejected() {
        let (_temp, storage) = seeded_storage();
        let output = run(&storage, "4\n1\nS1003\nCS101\nninety\n1\nS1003\nCS101\n120\n0\n7\n");
        assert!(output.contains("'ninety' is not a valid number"));
        assert!(output.contains("Error: Validation error"));
    }
}
