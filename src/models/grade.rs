//! Letter grades and the marks-to-grade threshold table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade on the S..F scale, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Minimum marks for each passing grade, best first; anything lower is F
const THRESHOLDS: [(f64, Grade); 6] = [
    (90.0, Grade::S),
    (80.0, Grade::A),
    (70.0, Grade::B),
    (60.0, Grade::C),
    (50.0, Grade::D),
    (40.0, Grade::E),
];

impl Grade {
    /// All grades from best to worst
    pub const ALL: [Grade; 7] = [
        Grade::S,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// Derive the grade for a mark. Boundaries are inclusive.
    pub fn from_marks(marks: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(min, _)| marks >= *min)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    /// Grade points on the 10-point scale
    pub fn grade_point(&self) -> f64 {
        match self {
            Self::S => 10.0,
            Self::A => 9.0,
            Self::B => 8.0,
            Self::C => 7.0,
            Self::D => 6.0,
            Self::E => 5.0,
            Self::F => 0.0,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::S => "Outstanding",
            Self::A => "Excellent",
            Self::B => "Very Good",
            Self::C => "Good",
            Self::D => "Average",
            Self::E => "Pass",
            Self::F => "Fail",
        }
    }

    /// Single-letter form
    pub fn letter(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }

    pub fn is_passing(&self) -> bool {
        !matches!(self, Self::F)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.letter(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_table() {
        assert_eq!(Grade::from_marks(100.0), Grade::S);
        assert_eq!(Grade::from_marks(90.0), Grade::S);
        assert_eq!(Grade::from_marks(89.99), Grade::A);
        assert_eq!(Grade::from_marks(85.0), Grade::A);
        assert_eq!(Grade::from_marks(80.0), Grade::A);
        assert_eq!(Grade::from_marks(70.0), Grade::B);
        assert_eq!(Grade::from_marks(60.0), Grade::C);
        assert_eq!(Grade::from_marks(50.0), Grade::D);
        assert_eq!(Grade::from_marks(40.0), Grade::E);
        assert_eq!(Grade::from_marks(39.0), Grade::F);
        assert_eq!(Grade::from_marks(0.0), Grade::F);
    }

    #[test]
    fn test_grade_points_descend() {
        let points: Vec<f64> = Grade::ALL.iter().map(|g| g.grade_point()).collect();
        assert_eq!(points, vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 0.0]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Grade::A.to_string(), "A (Excellent)");
        assert_eq!(Grade::F.letter(), "F");
        assert!(!Grade::F.is_passing());
        assert!(Grade::E.is_passing());
    }
}
