#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::notify::NotificationKind;
use crate::registry::params::{CreateBackupParams, DeleteBackupParams, RestoreBackupParams};
use crate::registry::validation::validate_non_empty;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn create_backup(
    state: &Arc<AppState>,
    p: CreateBackupParams,
) -> Result<CommandOutput, BridgeError> {
    state
        .ui
        .progress("create_backup", 0.0, Some("Creating backup"));
    let result = state
        .backend
        .create_backup(&p.backup_type, &p.description, &p.created_by);
    state.ui.progress("create_backup", 1.0, None);
    let info = result?;
    CommandOutput::json("Backup created.", &info)
}

pub fn list_backups(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let backups = state.backend.list_backups()?;
    CommandOutput::json("Available backups", &backups)
}

pub fn restore_backup(
    state: &Arc<AppState>,
    p: RestoreBackupParams,
) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.backup_path, "backup_path")?;
    if !p.confirm {
        return Err(BridgeError::ValidationError {
            message: "Restore requires confirmation".to_string(),
        });
    }
    state
        .ui
        .progress("restore_backup", 0.0, Some("Restoring backup"));
    let result = state.backend.restore_backup(&p.backup_path, p.confirm);
    state.ui.progress("restore_backup", 1.0, None);
    let info = result?;
    state.ui.notify("Backup restored", NotificationKind::Success);
    CommandOutput::json("Backup restored.", &info)
}

pub fn delete_backup(
    state: &Arc<AppState>,
    p: DeleteBackupParams,
) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.backup_filename, "backup_filename")?;
    let info = state.backend.delete_backup(&p.backup_filename)?;
    CommandOutput::json("Backup deleted.", &info)
}
