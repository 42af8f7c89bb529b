//! Academic semester

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semester a course is offered in
///
/// Variants are declared in calendar order so the derived `Ord` matches the
/// order transcripts are printed in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    #[default]
    Spring,
    Summer,
    Fall,
}

impl Semester {
    /// All semesters in calendar order
    pub const ALL: [Semester; 3] = [Semester::Spring, Semester::Summer, Semester::Fall];

    /// Position within the academic year, starting at 1
    pub fn order(&self) -> u8 {
        match self {
            Self::Spring => 1,
            Self::Summer => 2,
            Self::Fall => 3,
        }
    }

    /// Long display name, e.g. "Fall Semester"
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spring => "Spring Semester",
            Self::Summer => "Summer Semester",
            Self::Fall => "Fall Semester",
        }
    }

    /// Parse a semester from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spring" | "spring semester" => Some(Self::Spring),
            "summer" | "summer semester" => Some(Self::Summer),
            "fall" | "autumn" | "fall semester" => Some(Self::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spring => write!(f, "Spring"),
            Self::Summer => write!(f, "Summer"),
            Self::Fall => write!(f, "Fall"),
        }
    }
}
