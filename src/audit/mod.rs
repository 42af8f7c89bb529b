//! Audit logging for Registrar
//!
//! Every create, update and delete performed through the services is recorded
//! in `audit.log` as one JSON object per line, with before/after snapshots and
//! a short field diff for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
