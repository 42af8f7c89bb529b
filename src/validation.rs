//! Field-level validation shared by the models and the import path
//!
//! Each check returns a `FieldError` describing the first violated rule.

use std::fmt;

/// Minimum length of a student identifier
pub const STUDENT_ID_MIN_LEN: usize = 3;

/// Maximum length of a student identifier
pub const STUDENT_ID_MAX_LEN: usize = 20;

/// A violated field rule
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Empty(&'static str),
    InvalidStudentId(String),
    InvalidEmail(String),
    InvalidCourseCode(String),
    CreditsNotPositive,
    CreditsTooHigh { credits: u32, max: u32 },
    MarksOutOfRange(f64),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{} cannot be empty", field),
            Self::InvalidStudentId(id) => write!(
                f,
                "Student ID '{}' must be {}-{} alphanumeric characters",
                id, STUDENT_ID_MIN_LEN, STUDENT_ID_MAX_LEN
            ),
            Self::InvalidEmail(email) => write!(f, "Invalid email format: '{}'", email),
            Self::InvalidCourseCode(code) => {
                write!(f, "Course code '{}' must not contain whitespace", code)
            }
            Self::CreditsNotPositive => write!(f, "Course credits must be positive"),
            Self::CreditsTooHigh { credits, max } => {
                write!(f, "Course credits cannot exceed {} (got {})", max, credits)
            }
            Self::MarksOutOfRange(marks) => {
                write!(f, "Marks must be between 0 and 100 (got {})", marks)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Validate a student identifier: 3-20 ASCII alphanumerics
pub fn validate_student_id(id: &str) -> Result<(), FieldError> {
    if id.trim().is_empty() {
        return Err(FieldError::Empty("Student ID"));
    }

    let len_ok = (STUDENT_ID_MIN_LEN..=STUDENT_ID_MAX_LEN).contains(&id.len());
    if !len_ok || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldError::InvalidStudentId(id.to_string()));
    }

    Ok(())
}

/// Validate a non-empty text field
pub fn validate_required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::Empty(field))
    } else {
        Ok(())
    }
}

/// Validate an email address. An empty address is accepted.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    if is_valid_email(email) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail(email.to_string()))
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-'));
    if !local_ok {
        return false;
    }

    // The domain is matched greedily, so the TLD is whatever follows the last dot
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    host_ok && tld_ok
}

/// Validate a course code: non-empty, no whitespace
pub fn validate_course_code(code: &str) -> Result<(), FieldError> {
    if code.trim().is_empty() {
        return Err(FieldError::Empty("Course code"));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(FieldError::InvalidCourseCode(code.to_string()));
    }
    Ok(())
}

/// Validate a course's credit value against the configured ceiling
pub fn validate_credits(credits: u32, max: u32) -> Result<(), FieldError> {
    if credits == 0 {
        return Err(FieldError::CreditsNotPositive);
    }
    if credits > max {
        return Err(FieldError::CreditsTooHigh { credits, max });
    }
    Ok(())
}

/// Validate recorded marks: finite and within [0, 100]
pub fn validate_marks(marks: f64) -> Result<(), FieldError> {
    if marks.is_finite() && (0.0..=100.0).contains(&marks) {
        Ok(())
    } else {
        Err(FieldError::MarksOutOfRange(marks))
    }
}
