//! Course enrollment statistics

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{RegistrarError, RegistrarResult};
use crate::models::Semester;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct CourseEnrollmentRow {
    pub code: String,
    pub title: String,
    pub semester: Semester,
    pub credits: u32,
    pub enrolled: usize,
}

/// Enrollment counts for active courses plus per-semester totals
#[derive(Debug, Clone)]
pub struct EnrollmentStatsReport {
    /// Active courses, most enrolled first
    pub courses: Vec<CourseEnrollmentRow>,
    pub by_semester: BTreeMap<Semester, usize>,
}

impl EnrollmentStatsReport {
    pub fn generate(storage: &Storage) -> RegistrarResult<Self> {
        let mut courses = Vec::new();
        let mut by_semester: BTreeMap<Semester, usize> =
            Semester::ALL.iter().map(|s| (*s, 0)).collect();

        for course in storage.courses.get_all()? {
            let enrolled = storage.enrollments.count_by_course(&course.code)?;
            *by_semester.entry(course.semester).or_default() += enrolled;
            if !course.active {
                continue;
            }
            courses.push(CourseEnrollmentRow {
                enrolled,
                code: course.code.to_string(),
                title: course.title,
                semester: course.semester,
                credits: course.credits,
            });
        }
        courses.sort_by(|a, b| b.enrolled.cmp(&a.enrolled).then_with(|| a.code.cmp(&b.code)));

        Ok(Self {
            courses,
            by_semester,
        })
    }

    pub fn total_enrollments(&self) -> usize {
        self.by_semester.values().sum()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::from("Course Enrollment Statistics\n");
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:<30} {:<8} {:>7} {:>6}\n",
            "Code", "Title", "Semester", "Credits", "Count"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.courses {
            output.push_str(&format!(
                "{:<10} {:<30} {:<8} {:>7} {:>6}\n",
                row.code,
                truncate(&row.title, 30),
                row.semester.to_string(),
                row.credits,
                row.enrolled
            ));
        }

        output.push('\n');
        output.push_str("Enrollments by semester\n");
        for (semester, count) in &self.by_semester {
            output.push_str(&format!("  {:<18} {:>5}\n", semester.display_name(), count));
        }
        output.push_str(&format!("  {:<18} {:>5}\n", "Total", self.total_enrollments()));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> RegistrarResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Code", "Title", "Semester", "Credits", "Enrolled"])?;
        for row in &self.courses {
            csv.write_record([
                row.code.clone(),
                row.title.clone(),
                row.semester.to_string(),
                row.credits.to_string(),
                row.enrolled.to_string(),
            ])?;
        }
        csv.flush()
            .map_err(|e| RegistrarError::Export(e.to_string()))
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CourseService;
    use crate::testing::seeded_storage;

    #[test]
    fn test_counts() {
        let (_temp, storage) = seeded_storage();
        let report = EnrollmentStatsReport::generate(&storage).unwrap();

        assert_eq!(report.courses[0].code, "CS101");
        assert_eq!(report.courses[0].enrolled, 3);
        assert_eq!(report.by_semester[&Semester::Fall], 4);
        assert_eq!(report.by_semester[&Semester::Spring], 2);
        assert_eq!(report.by_semester[&Semester::Summer], 0);
        assert_eq!(report.total_enrollments(), 6);
    }

    #[test]
    fn test_inactive_course_not_listed() {
        let (_temp, storage) = seeded_storage();
        CourseService::new(&storage).deactivate("HI100").unwrap();

        let report = EnrollmentStatsReport::generate(&storage).unwrap();
        assert!(report.courses.iter().all(|c| c.code != "HI100"));
        // Its enrollments still count toward the semester totals
        assert_eq!(report.total_enrollments(), 6);
    }

    #[test]
    fn test_format_and_csv() {
        let (_temp, storage) = seeded_storage();
        let report = EnrollmentStatsReport::generate(&storage).unwrap();

        let text = report.format_terminal();
        assert!(text.contains("Fall Semester"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("CS101,"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
    }
}
