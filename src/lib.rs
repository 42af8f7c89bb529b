//! Registrar - Terminal-based academic records manager
//!
//! This library keeps students, courses, enrollments and grades, enforces the
//! enrollment rules (eligibility, duplicates, per-semester credit cap) and
//! derives transcripts, GPAs and reports from the stored records.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `validation`: Field-level checks for identifiers, emails and names
//! - `models`: Core data models (students, courses, enrollments, grades)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (registries, enrollment engine, GPA)
//! - `reports`: Derived reports (top students, GPA bands, enrollment counts)
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Audit logging system
//! - `backup`: Backup directories, restore and disk usage
//! - `display`: Terminal formatting
//! - `cli`: Command handlers and the interactive menu
//!
//! # Example
//!
//! ```rust,ignore
//! use registrar::config::{paths::RegistrarPaths, settings::Settings};
//! use registrar::services::EnrollmentService;
//! use registrar::storage::Storage;
//!
//! let paths = RegistrarPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! EnrollmentService::from_settings(&storage, &settings)
//!     .enroll("S1001", "CS101")?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod testing;

pub use error::RegistrarError;
