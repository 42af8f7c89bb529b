//! Top students report
//!
//! Ranks active students by overall GPA.

use std::io::Write;

use crate::error::{RegistrarError, RegistrarResult};
use crate::services::{StudentService, TranscriptService};
use crate::storage::Storage;

/// One row of the ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStudent {
    pub rank: usize,
    pub student_id: String,
    pub name: String,
    pub gpa: f64,
    /// Graded credits behind the GPA
    pub credits: u32,
}

/// Top students report
#[derive(Debug, Clone)]
pub struct TopStudentsReport {
    pub limit: usize,
    pub rows: Vec<RankedStudent>,
}

impl TopStudentsReport {
    /// Rank active students by GPA, highest first; ties go to the lower id
    pub fn generate(storage: &Storage, limit: usize) -> RegistrarResult<Self> {
        let transcripts = TranscriptService::new(storage);

        let mut scored = Vec::new();
        for student in StudentService::new(storage).list(false)? {
            let transcript = transcripts.generate(student.id.as_str())?;
            scored.push((student, transcript.overall_gpa, transcript.total_credits));
        }

        scored.sort_by(|(a, gpa_a, _), (b, gpa_b, _)| {
            gpa_b
                .partial_cmp(gpa_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let rows = scored
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (student, gpa, credits))| RankedStudent {
                rank: i + 1,
                student_id: student.id.to_string(),
                name: student.name.full(),
                gpa,
                credits,
            })
            .collect();

        Ok(Self { limit, rows })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format!("Top {} Students by GPA\n", self.limit);
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No active students.\n");
            return output;
        }

        output.push_str(&format!(
            "{:>4}  {:<12} {:<28} {:>6} {:>7}\n",
            "Rank", "ID", "Name", "GPA", "Credits"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for row in &self.rows {
            output.push_str(&format!(
                "{:>4}  {:<12} {:<28} {:>6.2} {:>7}\n",
                row.rank, row.student_id, row.name, row.gpa, row.credits
            ));
        }
        output
    }

    /// Write the ranking as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> RegistrarResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Rank", "ID", "Name", "GPA", "Credits"])?;
        for row in &self.rows {
            csv.write_record([
                row.rank.to_string(),
                row.student_id.clone(),
                row.name.clone(),
                format!("{:.2}", row.gpa),
                row.credits.to_string(),
            ])?;
        }
        csv.flush()
            .map_err(|e| RegistrarError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::seeded_storage;

    #[test]
    fn test_ranking_order_and_limit() {
        let (_temp, storage) = seeded_storage();

        let report = TopStudentsReport::generate(&storage, 2).unwrap();
        let ids: Vec<_> = report.rows.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["S1002", "S1001"]);
        assert_eq!(report.rows[0].rank, 1);
        assert!((report.rows[0].gpa - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_inactive_students_excluded() {
        let (_temp, storage) = seeded_storage();

        let report = TopStudentsReport::generate(&storage, 10).unwrap();
        assert!(report.rows.iter().all(|r| r.student_id != "S1009"));
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn test_outputs() {
        let (_temp, storage) = seeded_storage();
        let report = TopStudentsReport::generate(&storage, 10).unwrap();

        let text = report.format_terminal();
        assert!(text.contains("Top 10 Students by GPA"));
        assert!(text.contains("Grace Hopper"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.starts_with("Rank,ID,Name,GPA,Credits\n1,S1002,Grace Hopper,10.00,"));
    }
}
