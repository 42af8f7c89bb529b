//! Enrollment repository for JSON storage
//!
//! Enrollments are indexed both by student and by course so that either side
//! of the link can be walked without scanning every record.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RegistrarResult;
use crate::models::{CourseCode, Enrollment, EnrollmentId, StudentId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EnrollmentData {
    enrollments: Vec<Enrollment>,
}

/// Records plus the two secondary indices, kept under one lock so they
/// cannot drift apart
#[derive(Default)]
struct EnrollmentIndex {
    records: HashMap<EnrollmentId, Enrollment>,
    by_student: HashMap<StudentId, Vec<EnrollmentId>>,
    by_course: HashMap<CourseCode, Vec<EnrollmentId>>,
}

impl EnrollmentIndex {
    fn insert(&mut self, enrollment: Enrollment) {
        let id = enrollment.id;
        if !self.records.contains_key(&id) {
            self.by_student
                .entry(enrollment.student_id.clone())
                .or_default()
                .push(id);
            self.by_course
                .entry(enrollment.course_code.clone())
                .or_default()
                .push(id);
        }
        self.records.insert(id, enrollment);
    }

    fn remove(&mut self, id: EnrollmentId) -> Option<Enrollment> {
        let enrollment = self.records.remove(&id)?;
        if let Some(ids) = self.by_student.get_mut(&enrollment.student_id) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_student.remove(&enrollment.student_id);
            }
        }
        if let Some(ids) = self.by_course.get_mut(&enrollment.course_code) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_course.remove(&enrollment.course_code);
            }
        }
        Some(enrollment)
    }

    fn collect(&self, ids: Option<&Vec<EnrollmentId>>) -> Vec<Enrollment> {
        let mut enrollments: Vec<_> = ids
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect();
        enrollments.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        enrollments
    }
}

/// Repository for enrollment persistence with indexing
pub struct EnrollmentRepository {
    path: PathBuf,
    index: RwLock<EnrollmentIndex>,
}

impl EnrollmentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            index: RwLock::new(EnrollmentIndex::default()),
        }
    }

    /// Load enrollments from disk and rebuild the indices
    pub fn load(&self) -> RegistrarResult<()> {
        let file_data: EnrollmentData = read_json(&self.path)?;

        let mut index = write_guard(&self.index)?;
        *index = EnrollmentIndex::default();
        for enrollment in file_data.enrollments {
            index.insert(enrollment);
        }
        Ok(())
    }

    /// Save enrollments to disk in enrollment order
    pub fn save(&self) -> RegistrarResult<()> {
        let enrollments = self.get_all()?;
        write_json_atomic(&self.path, &EnrollmentData { enrollments })
    }

    pub fn get(&self, id: EnrollmentId) -> RegistrarResult<Option<Enrollment>> {
        let index = read_guard(&self.index)?;
        Ok(index.records.get(&id).cloned())
    }

    /// Get all enrollments, oldest first
    pub fn get_all(&self) -> RegistrarResult<Vec<Enrollment>> {
        let index = read_guard(&self.index)?;
        let mut enrollments: Vec<_> = index.records.values().cloned().collect();
        enrollments.sort_by(|a, b| {
            a.enrolled_at
                .cmp(&b.enrolled_at)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        Ok(enrollments)
    }

    /// Find the enrollment for a (student, course) pair
    pub fn find(
        &self,
        student_id: &StudentId,
        course_code: &CourseCode,
    ) -> RegistrarResult<Option<Enrollment>> {
        let index = read_guard(&self.index)?;
        Ok(index
            .by_student
            .get(student_id)
            .into_iter()
            .flatten()
            .filter_map(|id| index.records.get(id))
            .find(|e| e.matches(student_id, course_code))
            .cloned())
    }

    pub fn get_by_student(&self, student_id: &StudentId) -> RegistrarResult<Vec<Enrollment>> {
        let index = read_guard(&self.index)?;
        Ok(index.collect(index.by_student.get(student_id)))
    }

    pub fn get_by_course(&self, course_code: &CourseCode) -> RegistrarResult<Vec<Enrollment>> {
        let index = read_guard(&self.index)?;
        Ok(index.collect(index.by_course.get(course_code)))
    }

    pub fn count_by_course(&self, course_code: &CourseCode) -> RegistrarResult<usize> {
        let index = read_guard(&self.index)?;
        Ok(index.by_course.get(course_code).map_or(0, Vec::len))
    }

    /// Insert or replace an enrollment
    pub fn upsert(&self, enrollment: Enrollment) -> RegistrarResult<()> {
        let mut index = write_guard(&self.index)?;
        index.insert(enrollment);
        Ok(())
    }

    /// Remove an enrollment from the records and both indices
    pub fn delete(&self, id: EnrollmentId) -> RegistrarResult<Option<Enrollment>> {
        let mut index = write_guard(&self.index)?;
        Ok(index.remove(id))
    }

    pub fn count(&self) -> RegistrarResult<usize> {
        let index = read_guard(&self.index)?;
        Ok(index.records.len())
    }
}
