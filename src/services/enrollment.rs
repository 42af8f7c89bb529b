//! Enrollment service
//!
//! Enforces the cross-registry enrollment rules (student and course status,
//! one enrollment per pair, per-semester credit cap) and records grades.

use std::collections::BTreeMap;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{Course, CourseCode, Enrollment, Semester, Student, StudentId};
use crate::storage::Storage;

/// Decide whether `student` may enroll in `course`
///
/// `semester_credits` is the credit total the student already carries in the
/// course's semester. Checks run in a fixed order and the first failure wins.
pub fn check_enrollment(
    student: &Student,
    course: &Course,
    already_enrolled: bool,
    semester_credits: u32,
    credit_limit: u32,
) -> RegistrarResult<()> {
    if !student.status.can_enroll() {
        return Err(RegistrarError::Ineligible(format!(
            "Student '{}' is {} and cannot enroll",
            student.id,
            student.status.to_string().to_lowercase()
        )));
    }

    if !course.active {
        return Err(RegistrarError::Ineligible(format!(
            "Course '{}' is not accepting enrollments",
            course.code
        )));
    }

    if already_enrolled {
        return Err(RegistrarError::DuplicateEnrollment {
            student: student.id.to_string(),
            course: course.code.to_string(),
        });
    }

    if semester_credits.saturating_add(course.credits) > credit_limit {
        return Err(RegistrarError::CreditLimitExceeded {
            student: student.id.to_string(),
            course: course.code.to_string(),
            semester: course.semester.to_string(),
            current: semester_credits,
            requested: course.credits,
            limit: credit_limit,
        });
    }

    Ok(())
}

/// Service for enrollments and grading
pub struct EnrollmentService<'a> {
    storage: &'a Storage,
    credit_limit: u32,
}

impl<'a> EnrollmentService<'a> {
    /// Enrollment service with the default semester cap
    #[cfg(test)]
    pub(crate) fn new(storage: &'a Storage) -> Self {
        Self::from_settings(storage, &Settings::default())
    }

    /// Enrollment service enforcing the configured semester cap
    pub fn from_settings(storage: &'a Storage, settings: &Settings) -> Self {
        Self::with_credit_limit(storage, settings.max_credits_per_semester)
    }

    pub fn with_credit_limit(storage: &'a Storage, credit_limit: u32) -> Self {
        Self {
            storage,
            credit_limit,
        }
    }

    pub fn credit_limit(&self) -> u32 {
        self.credit_limit
    }

    fn load_pair(&self, student_id: &str, course_code: &str) -> RegistrarResult<(Student, Course)> {
        let student = self
            .storage
            .students
            .get(&StudentId::new(student_id))?
            .ok_or_else(|| RegistrarError::student_not_found(student_id.trim()))?;
        let course = self
            .storage
            .courses
            .get(&CourseCode::new(course_code))?
            .ok_or_else(|| RegistrarError::course_not_found(course_code.trim()))?;
        Ok((student, course))
    }

    /// Credits the student carries across their enrollments in `semester`
    pub fn semester_credits(&self, student_id: &StudentId, semester: Semester) -> RegistrarResult<u32> {
        let mut total = 0;
        for enrollment in self.storage.enrollments.get_by_student(student_id)? {
            if let Some(course) = self.storage.courses.get(&enrollment.course_code)? {
                if course.semester == semester {
                    total += course.credits;
                }
            }
        }
        Ok(total)
    }

    /// Enroll a student in a course
    pub fn enroll(&self, student_id: &str, course_code: &str) -> RegistrarResult<Enrollment> {
        let (mut student, course) = self.load_pair(student_id, course_code)?;

        let already_enrolled = self
            .storage
            .enrollments
            .find(&student.id, &course.code)?
            .is_some();
        let semester_credits = self.semester_credits(&student.id, course.semester)?;

        if let Err(err) = check_enrollment(
            &student,
            &course,
            already_enrolled,
            semester_credits,
            self.credit_limit,
        ) {
            tracing::warn!(student = %student.id, course = %course.code, "enrollment refused: {}", err);
            return Err(err);
        }

        let enrollment = Enrollment::new(student.id.clone(), course.code.clone());
        self.storage.enrollments.upsert(enrollment.clone())?;
        student.add_course(course.code.clone());
        self.storage.students.upsert(student.clone())?;

        self.storage.enrollments.save()?;
        self.storage.students.save()?;

        self.storage.log_create(
            EntityType::Enrollment,
            enrollment.id.to_string(),
            Some(format!("{} in {}", student.id, course.code)),
            &enrollment,
        )?;
        tracing::info!(
            student = %student.id,
            course = %course.code,
            semester_credits = semester_credits + course.credits,
            "student enrolled"
        );

        Ok(enrollment)
    }

    /// Remove a student's enrollment in a course
    pub fn unenroll(&self, student_id: &str, course_code: &str) -> RegistrarResult<Enrollment> {
        let (mut student, course) = self.load_pair(student_id, course_code)?;

        let enrollment = self
            .storage
            .enrollments
            .find(&student.id, &course.code)?
            .ok_or_else(|| RegistrarError::enrollment_not_found(&student.id, &course.code))?;

        self.storage.enrollments.delete(enrollment.id)?;
        student.remove_course(&course.code);
        self.storage.students.upsert(student.clone())?;

        self.storage.enrollments.save()?;
        self.storage.students.save()?;

        self.storage.log_delete(
            EntityType::Enrollment,
            enrollment.id.to_string(),
            Some(format!("{} in {}", student.id, course.code)),
            &enrollment,
        )?;
        tracing::info!(student = %student.id, course = %course.code, "student unenrolled");

        Ok(enrollment)
    }

    /// Record marks for an enrollment, replacing any earlier grade
    pub fn record_grade(
        &self,
        student_id: &str,
        course_code: &str,
        marks: f64,
    ) -> RegistrarResult<Enrollment> {
        let (student, course) = self.load_pair(student_id, course_code)?;

        let mut enrollment = self
            .storage
            .enrollments
            .find(&student.id, &course.code)?
            .ok_or_else(|| RegistrarError::enrollment_not_found(&student.id, &course.code))?;
        let before = enrollment.clone();

        enrollment
            .record_grade(marks)
            .map_err(|e| RegistrarError::Validation(e.to_string()))?;

        self.storage.enrollments.upsert(enrollment.clone())?;
        self.storage.enrollments.save()?;

        self.storage.log_update(
            EntityType::Enrollment,
            enrollment.id.to_string(),
            Some(format!("{} in {}", student.id, course.code)),
            &before,
            &enrollment,
        )?;

        Ok(enrollment)
    }

    pub fn enrollments_for_student(&self, student_id: &str) -> RegistrarResult<Vec<Enrollment>> {
        let id = StudentId::new(student_id);
        if !self.storage.students.contains(&id)? {
            return Err(RegistrarError::student_not_found(student_id.trim()));
        }
        self.storage.enrollments.get_by_student(&id)
    }

    pub fn enrollments_for_course(&self, course_code: &str) -> RegistrarResult<Vec<Enrollment>> {
        let code = CourseCode::new(course_code);
        if !self.storage.courses.contains(&code)? {
            return Err(RegistrarError::course_not_found(course_code.trim()));
        }
        self.storage.enrollments.get_by_course(&code)
    }

    pub fn course_enrollment_count(&self, course_code: &str) -> RegistrarResult<usize> {
        self.storage
            .enrollments
            .count_by_course(&CourseCode::new(course_code))
    }

    /// Number of enrollments in each semester; every semester is present
    pub fn stats_by_semester(&self) -> RegistrarResult<BTreeMap<Semester, usize>> {
        let mut counts: BTreeMap<Semester, usize> =
            Semester::ALL.iter().map(|s| (*s, 0)).collect();

        for course in self.storage.courses.get_all()? {
            let enrolled = self.storage.enrollments.count_by_course(&course.code)?;
            *counts.entry(course.semester).or_default() += enrolled;
        }

        Ok(counts)
    }
}
