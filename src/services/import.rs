//! CSV import service
//!
//! Imports students and courses from CSV files with a header row. Rows that
//! cannot be parsed are skipped; rows that parse but break a domain rule
//! (duplicate id, invalid email, ...) are rejected. Neither aborts the import.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::config::settings::Settings;
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::Semester;
use crate::services::course::{CourseService, NewCourse};
use crate::services::student::{NewStudent, StudentService};
use crate::storage::Storage;

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Rows turned into records
    pub imported: usize,
    /// Rows that could not be parsed
    pub skipped: usize,
    /// Rows that parsed but were refused by validation or duplicate checks
    pub rejected: usize,
    /// Message per failing row, keyed by 1-based line number in the file
    pub messages: BTreeMap<usize, String>,
}

impl ImportResult {
    pub fn total_rows(&self) -> usize {
        self.imported + self.skipped + self.rejected
    }

    fn skip(&mut self, line: usize, reason: String) {
        tracing::warn!(line, "skipping malformed row: {}", reason);
        self.skipped += 1;
        self.messages.insert(line, reason);
    }

    fn reject(&mut self, line: usize, err: RegistrarError) {
        tracing::warn!(line, "row rejected: {}", err);
        self.rejected += 1;
        self.messages.insert(line, err.to_string());
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    max_course_credits: u32,
    credit_limit: u32,
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Line number of a record, falling back to its position after the header
fn line_of(record: &StringRecord, idx: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(idx + 2)
}

fn parse_student(record: &StringRecord) -> Result<NewStudent, String> {
    if record.len() < 4 {
        return Err(format!(
            "expected at least 4 fields (id, reg_no, first_name, last_name), found {}",
            record.len()
        ));
    }

    let email = field(record, 4);
    Ok(NewStudent {
        id: field(record, 0).to_string(),
        reg_no: field(record, 1).to_string(),
        first_name: field(record, 2).to_string(),
        last_name: field(record, 3).to_string(),
        email: (!email.is_empty()).then(|| email.to_string()),
    })
}

fn parse_course(record: &StringRecord) -> Result<NewCourse, String> {
    if record.len() < 6 {
        return Err(format!(
            "expected 6 fields (code, title, credits, instructor, department, semester), found {}",
            record.len()
        ));
    }

    let credits = field(record, 2)
        .parse::<u32>()
        .map_err(|_| format!("invalid credits '{}'", field(record, 2)))?;
    let semester = Semester::parse(field(record, 5))
        .ok_or_else(|| format!("unknown semester '{}'", field(record, 5)))?;

    Ok(NewCourse {
        code: field(record, 0).to_string(),
        title: field(record, 1).to_string(),
        credits: Some(credits),
        instructor: field(record, 3).to_string(),
        department: field(record, 4).to_string(),
        semester: Some(semester),
    })
}

impl<'a> ImportService<'a> {
    #[cfg(test)]
    pub(crate) fn new(storage: &'a Storage) -> Self {
        Self::from_settings(storage, &Settings::default())
    }

    /// Import service validating courses against the configured limits
    pub fn from_settings(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            max_course_credits: settings.max_course_credits,
            credit_limit: settings.max_credits_per_semester,
        }
    }

    fn open(path: &Path) -> RegistrarResult<File> {
        File::open(path).map_err(|e| {
            RegistrarError::Import(format!("Cannot open {}: {}", path.display(), e))
        })
    }

    /// Import students from a CSV file
    pub fn import_students(&self, path: &Path) -> RegistrarResult<ImportResult> {
        let result = self.import_students_from_reader(Self::open(path)?)?;
        tracing::info!(
            file = %path.display(),
            imported = result.imported,
            skipped = result.skipped,
            rejected = result.rejected,
            "student import finished"
        );
        Ok(result)
    }

    /// Import students from CSV text: `id, reg_no, first_name, last_name[, email]`
    pub fn import_students_from_reader<R: Read>(&self, reader: R) -> RegistrarResult<ImportResult> {
        let service = StudentService::new(self.storage);
        self.import_rows(reader, parse_student, |input| service.add(input).map(|_| ()))
    }

    /// Import courses from a CSV file
    pub fn import_courses(&self, path: &Path) -> RegistrarResult<ImportResult> {
        let result = self.import_courses_from_reader(Self::open(path)?)?;
        tracing::info!(
            file = %path.display(),
            imported = result.imported,
            skipped = result.skipped,
            rejected = result.rejected,
            "course import finished"
        );
        Ok(result)
    }

    /// Import courses from CSV text:
    /// `code, title, credits, instructor, department, semester`
    pub fn import_courses_from_reader<R: Read>(&self, reader: R) -> RegistrarResult<ImportResult> {
        let service = CourseService::with_limits(self.storage, self.max_course_credits, self.credit_limit);
        self.import_rows(reader, parse_course, |input| service.add(input).map(|_| ()))
    }

    fn import_rows<R, T, P, A>(&self, reader: R, parse: P, add: A) -> RegistrarResult<ImportResult>
    where
        R: Read,
        P: Fn(&StringRecord) -> Result<T, String>,
        A: Fn(T) -> RegistrarResult<()>,
    {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut result = ImportResult::default();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(idx + 2);
                    result.skip(line, format!("unreadable row: {}", e));
                    continue;
                }
            };

            let line = line_of(&record, idx);
            if record.iter().all(str::is_empty) {
                continue;
            }

            match parse(&record) {
                Ok(input) => match add(input) {
                    Ok(()) => result.imported += 1,
                    Err(err @ (RegistrarError::Validation(_) | RegistrarError::Duplicate { .. })) => {
                        result.reject(line, err)
                    }
                    Err(err) => return Err(err),
                },
                Err(reason) => result.skip(line, reason),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RegistrarPaths;
    use crate::models::{CourseCode, StudentId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_import_students() {
        let (_temp, storage) = create_test_storage();
        let csv = "\
id,reg_no,first_name,last_name,email
S1001,REG-1,Ada,Lovelace,ada@example.com
S1002,REG-2,Grace,Hopper
";
        let result = ImportService::new(&storage)
            .import_students_from_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.total_rows(), 2);
        let grace = storage.students.get(&StudentId::new("S1002")).unwrap().unwrap();
        assert!(grace.email.is_none());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let (_temp, storage) = create_test_storage();
        let csv = "\
id,reg_no,first_name,last_name
S1001,REG-1,Ada
S1002,REG-2,Grace,Hopper
";
        let result = ImportService::new(&storage)
            .import_students_from_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 1);
        assert!(result.messages[&2].contains("expected at least 4 fields"));
        assert!(storage.students.get(&StudentId::new("S1002")).unwrap().is_some());
    }

    #[test]
    fn test_rule_violations_are_rejected_per_row() {
        let (_temp, storage) = create_test_storage();
        let csv = "\
id,reg_no,first_name,last_name,email
S1001,REG-1,Ada,Lovelace,
S1001,REG-9,Dup,Licate,
S1003,REG-3,Bad,Email,nope
S1004,REG-4,Katherine,Johnson,kj@nasa.gov
";
        let result = ImportService::new(&storage)
            .import_students_from_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.rejected, 2);
        assert!(result.messages[&3].contains("already exists"));
        assert!(result.messages[&4].contains("email"));
    }

    #[test]
    fn test_import_courses() {
        let (_temp, storage) = create_test_storage();
        let csv = "\
code,title,credits,instructor,department,semester
CS101,Intro to Programming,4,Dr. Hopper,Computer Science,FALL
MA101,Calculus,x,Dr. Newton,Mathematics,SPRING
PH101,Physics,3,Dr. Curie,Physics,WINTER
EN101,Writing,2,Dr. Austen,English,summer
";
        let result = ImportService::new(&storage)
            .import_courses_from_reader(csv.as_bytes())
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 2);
        assert!(result.messages[&3].contains("invalid credits"));
        assert!(result.messages[&4].contains("unknown semester"));

        let cs = storage.courses.get(&CourseCode::new("CS101")).unwrap().unwrap();
        assert_eq!(cs.semester, Semester::Fall);
        assert_eq!(cs.credits, 4);
    }

    #[test]
    fn test_import_uses_configured_course_ceiling() {
        let (_temp, storage) = create_test_storage();
        let csv = "\
code,title,credits,instructor,department,semester
CS499,Capstone,12,Dr. Hopper,Computer Science,FALL
";
        let strict = ImportService::new(&storage)
            .import_courses_from_reader(csv.as_bytes())
            .unwrap();
        assert_eq!(strict.rejected, 1);

        let settings = Settings {
            max_course_credits: 12,
            ..Settings::default()
        };
        let relaxed = ImportService::from_settings(&storage, &settings)
            .import_courses_from_reader(csv.as_bytes())
            .unwrap();
        assert_eq!(relaxed.imported, 1);
    }

    #[test]
    fn test_import_from_missing_file() {
        let (temp, storage) = create_test_storage();
        let err = ImportService::new(&storage)
            .import_students(&temp.path().join("missing.csv"))
            .unwrap_err();
        assert!(matches!(err, RegistrarError::Import(_)));
    }
}
