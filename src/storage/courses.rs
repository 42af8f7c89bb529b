//! Course repository for JSON storage
//!
//! Manages loading and saving courses to courses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RegistrarResult;
use crate::models::{Course, CourseCode};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CourseData {
    courses: Vec<Course>,
}

/// Repository for course persistence
pub struct CourseRepository {
    path: PathBuf,
    data: RwLock<HashMap<CourseCode, Course>>,
}

impl CourseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load courses from disk
    pub fn load(&self) -> RegistrarResult<()> {
        let file_data: CourseData = read_json(&self.path)?;

        let mut data = write_guard(&self.data)?;
        data.clear();
        for course in file_data.courses {
            data.insert(course.code.clone(), course);
        }
        Ok(())
    }

    /// Save courses to disk, ordered by code
    pub fn save(&self) -> RegistrarResult<()> {
        let courses = self.get_all()?;
        write_json_atomic(&self.path, &CourseData { courses })
    }

    pub fn get(&self, code: &CourseCode) -> RegistrarResult<Option<Course>> {
        let data = read_guard(&self.data)?;
        Ok(data.get(code).cloned())
    }

    /// Get all courses ordered by code
    pub fn get_all(&self) -> RegistrarResult<Vec<Course>> {
        let data = read_guard(&self.data)?;
        let mut courses: Vec<_> = data.values().cloned().collect();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }

    pub fn contains(&self, code: &CourseCode) -> RegistrarResult<bool> {
        let data = read_guard(&self.data)?;
        Ok(data.contains_key(code))
    }

    /// Insert or update a course
    pub fn upsert(&self, course: Course) -> RegistrarResult<()> {
        let mut data = write_guard(&self.data)?;
        data.insert(course.code.clone(), course);
        Ok(())
    }

    pub fn delete(&self, code: &CourseCode) -> RegistrarResult<Option<Course>> {
        let mut data = write_guard(&self.data)?;
        Ok(data.remove(code))
    }

    pub fn count(&self) -> RegistrarResult<usize> {
        let data = read_guard(&self.data)?;
        Ok(data.len())
    }
}
