//! Audit log CLI command

use clap::Args;

use crate::audit::EntityType;
use crate::error::{RegistrarError, RegistrarResult};
use crate::storage::Storage;

/// Arguments of `audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of most recent entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Only entries about this entity type (student, course, enrollment)
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Only entries about this entity id (requires --entity)
    #[arg(long, requires = "entity")]
    pub id: Option<String>,
}

/// Handle the audit command
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> RegistrarResult<()> {
    let logger = storage.audit();

    let mut entries = match &args.entity {
        Some(entity) => {
            let entity_type = EntityType::parse(entity).ok_or_else(|| {
                RegistrarError::Validation(format!(
                    "Invalid entity type: '{}'. Valid types: student, course, enrollment",
                    entity
                ))
            })?;
            logger.read_for(entity_type, args.id.as_deref().map(str::trim))?
        }
        None => logger.read_all()?,
    };

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    let start = entries.len().saturating_sub(args.limit);
    let shown = entries.split_off(start);
    for entry in &shown {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!("Showing {} of {} entries", shown.len(), start + shown.len());

    Ok(())
}
