//! GPA distribution report
//!
//! Buckets active students into fixed GPA bands on the 10-point scale.

use std::fmt;

use crate::error::RegistrarResult;
use crate::services::{StudentService, TranscriptService};
use crate::storage::Storage;

/// A GPA band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpaBand {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

impl GpaBand {
    /// All bands, best first
    pub const ALL: [GpaBand; 4] = [
        GpaBand::Excellent,
        GpaBand::Good,
        GpaBand::Average,
        GpaBand::BelowAverage,
    ];

    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 9.0 {
            Self::Excellent
        } else if gpa >= 8.0 {
            Self::Good
        } else if gpa >= 6.0 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    /// Printable GPA range of the band
    pub fn range(&self) -> &'static str {
        match self {
            Self::Excellent => "9.0 - 10.0",
            Self::Good => "8.0 - 8.99",
            Self::Average => "6.0 - 7.99",
            Self::BelowAverage => "below 6.0",
        }
    }
}

impl fmt::Display for GpaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Average => write!(f, "Average"),
            Self::BelowAverage => write!(f, "Below Average"),
        }
    }
}

/// GPA distribution report
#[derive(Debug, Clone)]
pub struct GpaDistributionReport {
    /// Every band in `GpaBand::ALL` order, empty bands included
    pub bands: Vec<(GpaBand, usize)>,
    pub total_students: usize,
}

impl GpaDistributionReport {
    pub fn generate(storage: &Storage) -> RegistrarResult<Self> {
        let transcripts = TranscriptService::new(storage);
        let mut bands: Vec<(GpaBand, usize)> = GpaBand::ALL.iter().map(|b| (*b, 0)).collect();

        let students = StudentService::new(storage).list(false)?;
        for student in &students {
            let band = GpaBand::from_gpa(transcripts.calculate_gpa(student.id.as_str())?);
            if let Some(entry) = bands.iter_mut().find(|(b, _)| *b == band) {
                entry.1 += 1;
            }
        }

        Ok(Self {
            bands,
            total_students: students.len(),
        })
    }

    pub fn count(&self, band: GpaBand) -> usize {
        self.bands
            .iter()
            .find(|(b, _)| *b == band)
            .map_or(0, |(_, n)| *n)
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::from("GPA Distribution (active students)\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for (band, count) in &self.bands {
            let pct = if self.total_students == 0 {
                0.0
            } else {
                *count as f64 * 100.0 / self.total_students as f64
            };
            output.push_str(&format!(
                "{:<14} {:<11} {:>5} {:>6.1}%\n",
                band.to_string(),
                band.range(),
                count,
                pct
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!("{:<26} {:>5}\n", "Total", self.total_students));
        output
    }
}
