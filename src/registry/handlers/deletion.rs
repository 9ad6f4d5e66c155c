#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::events::LogLevel;
use crate::registry::params::ExecuteDeletionParams;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn execute_deletion(
    state: &Arc<AppState>,
    p: ExecuteDeletionParams,
) -> Result<CommandOutput, BridgeError> {
    let result = state
        .backend
        .execute_deletion(p.entity_type, p.entity_id, &p.deleted_by)?;
    state.ui.log(
        LogLevel::Info,
        format!(
            "Deleted {} #{} (by {})",
            p.entity_type.slug(),
            p.entity_id,
            p.deleted_by
        ),
    );
    CommandOutput::json(
        format!("Deleted {} #{}.", p.entity_type.slug(), p.entity_id),
        &result,
    )
}
