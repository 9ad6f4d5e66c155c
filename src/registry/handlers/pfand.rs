#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::SubmitPfandReturnParams;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn submit_pfand_return(
    state: &Arc<AppState>,
    p: SubmitPfandReturnParams,
) -> Result<CommandOutput, BridgeError> {
    if p.product_list.is_empty() {
        return Err(BridgeError::ValidationError {
            message: "No deposit items given".to_string(),
        });
    }
    state.backend.submit_pfand_return(p.user_id, &p.product_list)?;
    Ok(CommandOutput::unit(format!(
        "Deposit return with {} items recorded.",
        p.product_list.len()
    )))
}

pub fn get_pfand_history(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let history = state.backend.get_pfand_history()?;
    CommandOutput::json("Deposit return history", &history)
}
