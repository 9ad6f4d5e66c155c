#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::MakePurchaseParams;
use crate::registry::validation::validate_positive_count;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn make_purchase(
    state: &Arc<AppState>,
    p: MakePurchaseParams,
) -> Result<CommandOutput, BridgeError> {
    validate_positive_count(p.quantity, "quantity")?;
    state
        .backend
        .make_purchase(p.user_id, p.product_id, p.quantity)?;
    Ok(CommandOutput::unit("Purchase recorded."))
}

pub fn get_all_sales(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let sales = state.backend.get_all_sales()?;
    CommandOutput::json("All sales", &sales)
}
