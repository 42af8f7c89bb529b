//! Transcript and GPA aggregation
//!
//! GPA is the credit-weighted mean of grade points over graded enrollments.
//! Ungraded enrollments are ignored; no graded credits means a GPA of 0.

use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{Course, Enrollment, Grade, Semester, Student, StudentId};
use crate::storage::Storage;

/// Credit-weighted GPA over `(grade, credits)` pairs
pub fn weighted_gpa<I>(graded: I) -> f64
where
    I: IntoIterator<Item = (Grade, u32)>,
{
    let (points, credits) = graded
        .into_iter()
        .fold((0.0, 0u32), |(points, credits), (grade, c)| {
            (points + grade.grade_point() * f64::from(c), credits + c)
        });

    if credits == 0 {
        0.0
    } else {
        points / f64::from(credits)
    }
}

/// One graded course on a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub course_code: String,
    pub title: String,
    pub credits: u32,
    pub marks: f64,
    pub grade: Grade,
}

/// All graded courses of one semester
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterRecord {
    pub semester: Semester,
    pub lines: Vec<TranscriptLine>,
    pub credits: u32,
    pub gpa: f64,
}

/// A student's academic transcript
#[derive(Debug, Clone)]
pub struct Transcript {
    pub student: Student,
    /// Semesters with at least one graded course, in calendar order
    pub semesters: Vec<SemesterRecord>,
    pub total_credits: u32,
    pub overall_gpa: f64,
}

/// Service computing GPAs and transcripts
pub struct TranscriptService<'a> {
    storage: &'a Storage,
}

impl<'a> TranscriptService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Graded enrollments joined with their courses
    fn graded_courses(&self, student_id: &StudentId) -> RegistrarResult<Vec<(Enrollment, Course)>> {
        let mut graded = Vec::new();
        for enrollment in self.storage.enrollments.get_by_student(student_id)? {
            if !enrollment.has_grade() {
                continue;
            }
            match self.storage.courses.get(&enrollment.course_code)? {
                Some(course) => graded.push((enrollment, course)),
                None => tracing::warn!(
                    student = %student_id,
                    course = %enrollment.course_code,
                    "graded enrollment refers to a missing course"
                ),
            }
        }
        Ok(graded)
    }

    fn require_student(&self, student_id: &str) -> RegistrarResult<Student> {
        self.storage
            .students
            .get(&StudentId::new(student_id))?
            .ok_or_else(|| RegistrarError::student_not_found(student_id.trim()))
    }

    /// Overall GPA for a student
    pub fn calculate_gpa(&self, student_id: &str) -> RegistrarResult<f64> {
        let student = self.require_student(student_id)?;
        let graded = self.graded_courses(&student.id)?;
        Ok(weighted_gpa(graded.iter().filter_map(|(e, c)| {
            e.letter_grade().map(|g| (g, c.credits))
        })))
    }

    /// GPA over the courses of a single semester
    pub fn calculate_semester_gpa(&self, student_id: &str, semester: Semester) -> RegistrarResult<f64> {
        let student = self.require_student(student_id)?;
        let graded = self.graded_courses(&student.id)?;
        Ok(weighted_gpa(
            graded
                .iter()
                .filter(|(_, c)| c.semester == semester)
                .filter_map(|(e, c)| e.letter_grade().map(|g| (g, c.credits))),
        ))
    }

    /// Build the full transcript for a student
    pub fn generate(&self, student_id: &str) -> RegistrarResult<Transcript> {
        let student = self.require_student(student_id)?;
        let graded = self.graded_courses(&student.id)?;

        let mut semesters = Vec::new();
        for semester in Semester::ALL {
            let mut lines: Vec<TranscriptLine> = graded
                .iter()
                .filter(|(_, c)| c.semester == semester)
                .filter_map(|(e, c)| {
                    e.grade.as_ref().map(|record| TranscriptLine {
                        course_code: c.code.to_string(),
                        title: c.title.clone(),
                        credits: c.credits,
                        marks: record.marks,
                        grade: record.grade,
                    })
                })
                .collect();

            if lines.is_empty() {
                continue;
            }
            lines.sort_by(|a, b| a.course_code.cmp(&b.course_code));

            semesters.push(SemesterRecord {
                semester,
                credits: lines.iter().map(|l| l.credits).sum(),
                gpa: weighted_gpa(lines.iter().map(|l| (l.grade, l.credits))),
                lines,
            });
        }

        let total_credits = semesters.iter().map(|s| s.credits).sum();
        let overall_gpa = weighted_gpa(
            semesters
                .iter()
                .flat_map(|s| s.lines.iter().map(|l| (l.grade, l.credits))),
        );

        Ok(Transcript {
            student,
            semesters,
            total_credits,
            overall_gpa,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RegistrarPaths;
    use crate::models::PersonName;
    use crate::services::EnrollmentService;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        storage
            .students
            .upsert(Student::new("S1001", "R1", PersonName::new("Ada", "Lovelace")))
            .unwrap();
        for (code, credits, sem) in [
            ("CS101", 4, Semester::Fall),
            ("MA101", 2, Semester::Fall),
            ("PH101", 3, Semester::Spring),
        ] {
            storage
                .courses
                .upsert(
                    Course::new(code, format!("{} title", code))
                        .with_credits(credits)
                        .with_semester(sem),
                )
                .unwrap();
        }
        (temp_dir, storage)
    }

    #[test]
    fn test_weighted_gpa() {
        assert_eq!(weighted_gpa(Vec::new()), 0.0);
        assert_eq!(weighted_gpa([(Grade::A, 3)]), 9.0);
        // (10*4 + 7*2) / 6 = 9.0
        assert!((weighted_gpa([(Grade::S, 4), (Grade::C, 2)]) - 9.0).abs() < 1e-9);
        assert_eq!(weighted_gpa([(Grade::F, 3), (Grade::S, 0)]), 0.0);
    }

    #[test]
    fn test_no_graded_enrollments_is_zero() {
        let (_temp, storage) = setup();
        EnrollmentService::new(&storage).enroll("S1001", "CS101").unwrap();

        let service = TranscriptService::new(&storage);
        assert_eq!(service.calculate_gpa("S1001").unwrap(), 0.0);
        assert!(service.generate("S1001").unwrap().semesters.is_empty());
    }

    #[test]
    fn test_transcript_groups_by_semester() {
        let (_temp, storage) = setup();
        let enrollments = EnrollmentService::new(&storage);
        for code in ["PH101", "CS101", "MA101"] {
            enrollments.enroll("S1001", code).unwrap();
        }
        enrollments.record_grade("S1001", "CS101", 92.0).unwrap(); // S, 4 credits
        enrollments.record_grade("S1001", "MA101", 65.0).unwrap(); // C, 2 credits
        enrollments.record_grade("S1001", "PH101", 75.0).unwrap(); // B, 3 credits

        let service = TranscriptService::new(&storage);
        let transcript = service.generate("S1001").unwrap();

        let order: Vec<_> = transcript.semesters.iter().map(|s| s.semester).collect();
        assert_eq!(order, vec![Semester::Spring, Semester::Fall]);

        let fall = &transcript.semesters[1];
        assert_eq!(fall.credits, 6);
        assert!((fall.gpa - 9.0).abs() < 1e-9);
        assert_eq!(fall.lines[0].course_code, "CS101");

        assert_eq!(transcript.total_credits, 9);
        // (40 + 14 + 24) / 9
        assert!((transcript.overall_gpa - 78.0 / 9.0).abs() < 1e-9);
        assert!((service.calculate_gpa("S1001").unwrap() - transcript.overall_gpa).abs() < 1e-9);
        assert!(
            (service
                .calculate_semester_gpa("S1001", Semester::Spring)
                .unwrap()
                - 8.0)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_unknown_student() {
        let (_temp, storage) = setup();
        let service = TranscriptService::new(&storage);
        assert!(service.generate("S9999").unwrap_err().is_not_found());
    }
}
