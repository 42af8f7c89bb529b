//! Configuration module for Registrar
//!
//! This module provides configuration management including:
//! - Base directory resolution
//! - User settings persistence
//! - Academic policy limits

pub mod paths;
pub mod settings;

pub use paths::RegistrarPaths;
pub use settings::Settings;
