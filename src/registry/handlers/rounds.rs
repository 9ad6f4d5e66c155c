#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::AddToastRoundParams;
use crate::registry::validation::validate_parallel_lists;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn add_toast_round(
    state: &Arc<AppState>,
    p: AddToastRoundParams,
) -> Result<CommandOutput, BridgeError> {
    if p.product_ids.is_empty() {
        return Err(BridgeError::ValidationError {
            message: "A toast round needs at least one product".to_string(),
        });
    }
    validate_parallel_lists(
        p.product_ids.len(),
        p.consumer_selections.len(),
        "product_ids",
        "consumer_selections",
    )?;
    validate_parallel_lists(
        p.product_ids.len(),
        p.donator_selections.len(),
        "product_ids",
        "donator_selections",
    )?;
    state.backend.add_toast_round(
        &p.product_ids,
        &p.consumer_selections,
        &p.donator_selections,
    )?;
    // The board is free again once the round is recorded.
    state.with_board_mut(crate::toast::ToastBoard::clear);
    Ok(CommandOutput::unit(format!(
        "Toast round with {} products recorded.",
        p.product_ids.len()
    )))
}

pub fn get_all_toast_rounds(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let rounds = state.backend.get_all_toast_rounds()?;
    CommandOutput::json("All toast rounds", &rounds)
}
