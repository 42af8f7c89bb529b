//! Student repository for JSON storage
//!
//! Manages loading and saving students to students.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RegistrarResult;
use crate::models::{Student, StudentId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

/// Serializable student data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct StudentData {
    students: Vec<Student>,
}

/// Repository for student persistence
pub struct StudentRepository {
    path: PathBuf,
    data: RwLock<HashMap<StudentId, Student>>,
    /// Index: registration number -> student id
    by_reg_no: RwLock<HashMap<String, StudentId>>,
}

impl StudentRepository {
    /// Create a new student repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_reg_no: RwLock::new(HashMap::new()),
        }
    }

    /// Load students from disk
    pub fn load(&self) -> RegistrarResult<()> {
        let file_data: StudentData = read_json(&self.path)?;

        let mut data = write_guard(&self.data)?;
        let mut by_reg_no = write_guard(&self.by_reg_no)?;
        data.clear();
        by_reg_no.clear();

        for student in file_data.students {
            by_reg_no.insert(student.reg_no.clone(), student.id.clone());
            data.insert(student.id.clone(), student);
        }

        Ok(())
    }

    /// Save students to disk, ordered by id
    pub fn save(&self) -> RegistrarResult<()> {
        let students = self.get_all()?;
        write_json_atomic(&self.path, &StudentData { students })
    }

    /// Get a student by id
    pub fn get(&self, id: &StudentId) -> RegistrarResult<Option<Student>> {
        let data = read_guard(&self.data)?;
        Ok(data.get(id).cloned())
    }

    /// Get a student by registration number
    pub fn get_by_reg_no(&self, reg_no: &str) -> RegistrarResult<Option<Student>> {
        let data = read_guard(&self.data)?;
        let by_reg_no = read_guard(&self.by_reg_no)?;
        Ok(by_reg_no
            .get(reg_no.trim())
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Get all students ordered by id
    pub fn get_all(&self) -> RegistrarResult<Vec<Student>> {
        let data = read_guard(&self.data)?;
        let mut students: Vec<_> = data.values().cloned().collect();
        students.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(students)
    }

    pub fn contains(&self, id: &StudentId) -> RegistrarResult<bool> {
        let data = read_guard(&self.data)?;
        Ok(data.contains_key(id))
    }

    /// Whether a registration number is already taken
    pub fn reg_no_in_use(&self, reg_no: &str) -> RegistrarResult<bool> {
        let by_reg_no = read_guard(&self.by_reg_no)?;
        Ok(by_reg_no.contains_key(reg_no.trim()))
    }

    /// Insert or update a student
    pub fn upsert(&self, student: Student) -> RegistrarResult<()> {
        let mut data = write_guard(&self.data)?;
        let mut by_reg_no = write_guard(&self.by_reg_no)?;

        if let Some(old) = data.get(&student.id) {
            by_reg_no.remove(&old.reg_no);
        }
        by_reg_no.insert(student.reg_no.clone(), student.id.clone());
        data.insert(student.id.clone(), student);
        Ok(())
    }

    /// Delete a student, returning the removed record
    pub fn delete(&self, id: &StudentId) -> RegistrarResult<Option<Student>> {
        let mut data = write_guard(&self.data)?;
        let mut by_reg_no = write_guard(&self.by_reg_no)?;

        let removed = data.remove(id);
        if let Some(student) = &removed {
            by_reg_no.remove(&student.reg_no);
        }
        Ok(removed)
    }

    pub fn count(&self) -> RegistrarResult<usize> {
        let data = read_guard(&self.data)?;
        Ok(data.len())
    }
}
