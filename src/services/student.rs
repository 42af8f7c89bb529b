//! Student service
//!
//! Provides business logic for student management: registration, lookup,
//! search, updates and deactivation.

use crate::audit::EntityType;
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::{PersonName, Student, StudentId, StudentStatus};
use crate::storage::Storage;

/// Service for student management
pub struct StudentService<'a> {
    storage: &'a Storage,
}

/// Input for registering a student
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub id: String,
    pub reg_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// Optional changes applied by `update`; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<StudentStatus>,
}

/// Counts of students by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentStats {
    pub total: usize,
    pub active: usize,
    /// Everyone not active, graduated and suspended included
    pub inactive: usize,
}

impl<'a> StudentService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new student
    pub fn add(&self, input: NewStudent) -> RegistrarResult<Student> {
        let name = PersonName::new(&input.first_name, &input.last_name);
        let mut student = Student::new(input.id.as_str(), &input.reg_no, name);
        if let Some(email) = &input.email {
            student.set_email(email);
        }

        student
            .validate()
            .map_err(|e| RegistrarError::Validation(e.to_string()))?;

        if self.storage.students.contains(&student.id)? {
            return Err(RegistrarError::Duplicate {
                entity_type: "Student",
                identifier: student.id.to_string(),
            });
        }
        if self.storage.students.reg_no_in_use(&student.reg_no)? {
            return Err(RegistrarError::Duplicate {
                entity_type: "Registration number",
                identifier: student.reg_no.clone(),
            });
        }

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_create(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.full()),
            &student,
        )?;
        tracing::info!(id = %student.id, reg_no = %student.reg_no, "student added");

        Ok(student)
    }

    pub fn get(&self, id: &StudentId) -> RegistrarResult<Option<Student>> {
        self.storage.students.get(id)
    }

    /// Find a student by id, falling back to registration number
    pub fn find(&self, identifier: &str) -> RegistrarResult<Option<Student>> {
        if let Some(student) = self.storage.students.get(&StudentId::new(identifier))? {
            return Ok(Some(student));
        }
        self.storage.students.get_by_reg_no(identifier)
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, identifier: &str) -> RegistrarResult<Student> {
        self.find(identifier)?
            .ok_or_else(|| RegistrarError::student_not_found(identifier))
    }

    /// List students ordered by id
    pub fn list(&self, include_inactive: bool) -> RegistrarResult<Vec<Student>> {
        let students = self.storage.students.get_all()?;
        Ok(if include_inactive {
            students
        } else {
            students.into_iter().filter(Student::is_active).collect()
        })
    }

    /// Search by case-insensitive substring of the full name and/or status
    pub fn search(
        &self,
        name_pattern: Option<&str>,
        status: Option<StudentStatus>,
    ) -> RegistrarResult<Vec<Student>> {
        let pattern = name_pattern
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());

        Ok(self
            .storage
            .students
            .get_all()?
            .into_iter()
            .filter(|s| status.map_or(true, |st| s.status == st))
            .filter(|s| {
                pattern
                    .as_deref()
                    .map_or(true, |p| s.name.full().to_lowercase().contains(p))
            })
            .collect())
    }

    /// Apply changes to a student; id and registration number never change
    pub fn update(&self, identifier: &str, changes: StudentUpdate) -> RegistrarResult<Student> {
        let mut student = self.require(identifier)?;
        let before = student.clone();

        if changes.first_name.is_some() || changes.last_name.is_some() {
            student.name = PersonName::new(
                changes.first_name.as_deref().unwrap_or(&student.name.first),
                changes.last_name.as_deref().unwrap_or(&student.name.last),
            );
        }
        if let Some(email) = &changes.email {
            student.set_email(email);
        }
        if let Some(status) = changes.status {
            student.set_status(status);
        }
        student.updated_at = chrono::Utc::now();

        student
            .validate()
            .map_err(|e| RegistrarError::Validation(e.to_string()))?;

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_update(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.full()),
            &before,
            &student,
        )?;

        Ok(student)
    }

    /// Mark a student inactive
    pub fn deactivate(&self, identifier: &str) -> RegistrarResult<Student> {
        let mut student = self.require(identifier)?;
        if student.status == StudentStatus::Inactive {
            return Err(RegistrarError::Validation(format!(
                "Student '{}' is already inactive",
                student.id
            )));
        }

        let before = student.clone();
        student.set_status(StudentStatus::Inactive);

        self.storage.students.upsert(student.clone())?;
        self.storage.students.save()?;

        self.storage.log_update(
            EntityType::Student,
            student.id.to_string(),
            Some(student.name.full()),
            &before,
            &student,
        )?;
        tracing::info!(id = %student.id, "student deactivated");

        Ok(student)
    }

    pub fn stats(&self) -> RegistrarResult<StudentStats> {
        let students = self.storage.students.get_all()?;
        let total = students.len();
        let active = students.iter().filter(|s| s.is_active()).count();
        Ok(StudentStats {
            total,
            active,
            inactive: total - active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RegistrarPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RegistrarPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn new_student(id: &str, reg_no: &str, first: &str, last: &str) -> NewStudent {
        NewStudent {
            id: id.into(),
            reg_no: reg_no.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: None,
        }
    }

    #[test]
    fn test_add_and_find() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);

        service
            .add(new_student("S1001", "REG-1", "Ada", "Lovelace"))
            .unwrap();

        assert!(service.find("S1001").unwrap().is_some());
        let by_reg = service.find("REG-1").unwrap().unwrap();
        assert_eq!(by_reg.id.as_str(), "S1001");
        assert!(service.find("nobody").unwrap().is_none());
        assert!(service.require("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);
        service
            .add(new_student("S1001", "REG-1", "Ada", "Lovelace"))
            .unwrap();

        let same_id = service.add(new_student("S1001", "REG-2", "Grace", "Hopper"));
        assert!(same_id.unwrap_err().is_duplicate());

        let same_reg = service.add(new_student("S1002", "REG-1", "Grace", "Hopper"));
        assert!(same_reg.unwrap_err().is_duplicate());
    }

    #[test]
    fn test_add_validates() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);

        let bad_id = service.add(new_student("S1", "REG-1", "Ada", "Lovelace"));
        assert!(bad_id.unwrap_err().is_validation());

        let mut bad_email = new_student("S1001", "REG-1", "Ada", "Lovelace");
        bad_email.email = Some("ada-at-example".into());
        assert!(service.add(bad_email).unwrap_err().is_validation());

        assert_eq!(storage.students.count().unwrap(), 0);
    }

    #[test]
    fn test_search() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);
        service
            .add(new_student("S1001", "REG-1", "Ada", "Lovelace"))
            .unwrap();
        service
            .add(new_student("S1002", "REG-2", "Grace", "Hopper"))
            .unwrap();
        service.deactivate("S1002").unwrap();

        assert_eq!(service.search(Some("LOVE"), None).unwrap().len(), 1);
        assert_eq!(service.search(Some("a"), None).unwrap().len(), 2);
        let inactive = service.search(None, Some(StudentStatus::Inactive)).unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id.as_str(), "S1002");
    }

    #[test]
    fn test_update_keeps_identity() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);
        service
            .add(new_student("S1001", "REG-1", "Ada", "Lovelace"))
            .unwrap();

        let updated = service
            .update(
                "S1001",
                StudentUpdate {
                    first_name: Some("Augusta".into()),
                    email: Some("ada@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name.full(), "Augusta Lovelace");
        assert_eq!(updated.reg_no, "REG-1");
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_deactivate_and_stats() {
        let (_temp, storage) = create_test_storage();
        let service = StudentService::new(&storage);
        service
            .add(new_student("S1001", "REG-1", "Ada", "Lovelace"))
            .unwrap();
        service
            .add(new_student("S1002", "REG-2", "Grace", "Hopper"))
            .unwrap();

        service.deactivate("S1001").unwrap();
        assert!(service.deactivate("S1001").unwrap_err().is_validation());

        let stats = service.stats().unwrap();
        assert_eq!(
            stats,
            StudentStats {
                total: 2,
                active: 1,
                inactive: 1
            }
        );
        assert_eq!(service.list(false).unwrap().len(), 1);
        assert_eq!(service.list(true).unwrap().len(), 2);
    }
}
