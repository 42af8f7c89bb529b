//! Storage layer for Registrar
//!
//! Each registry is an in-memory map behind an `RwLock`, persisted as a JSON
//! file with atomic writes. `Storage` owns all registries plus the audit log.

pub mod courses;
pub mod enrollments;
pub mod file_io;
pub mod init;
pub mod students;

pub use courses::CourseRepository;
pub use enrollments::EnrollmentRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use students::StudentRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::RegistrarPaths;
use crate::error::{RegistrarError, RegistrarResult};

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RegistrarResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| RegistrarError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RegistrarResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| RegistrarError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: RegistrarPaths,
    pub students: StudentRepository,
    pub courses: CourseRepository,
    pub enrollments: EnrollmentRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance; nothing is read until `load_all`
    pub fn new(paths: RegistrarPaths) -> RegistrarResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            students: StudentRepository::new(paths.students_file()),
            courses: CourseRepository::new(paths.courses_file()),
            enrollments: EnrollmentRepository::new(paths.enrollments_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &RegistrarPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all registries from disk
    pub fn load_all(&mut self) -> RegistrarResult<()> {
        self.students.load()?;
        self.courses.load()?;
        self.enrollments.load()?;
        tracing::debug!(
            students = self.students.count()?,
            courses = self.courses.count()?,
            enrollments = self.enrollments.count()?,
            "registries loaded"
        );
        Ok(())
    }

    /// Save all registries to disk
    pub fn save_all(&self) -> RegistrarResult<()> {
        self.students.save()?;
        self.courses.save()?;
        self.enrollments.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Append a create entry to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> RegistrarResult<()> {
        self.audit.log(&AuditEntry::create(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }

    /// Append an update entry, with a field diff, to the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> RegistrarResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Append a delete entry to the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> RegistrarResult<()> {
        self.audit.log(&AuditEntry::delete(
            entity_type,
            entity_id,
            entity_name,
            entity,
        ))
    }
}
