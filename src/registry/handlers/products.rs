#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::AddProductParams;
use crate::registry::validation::{
    validate_non_empty, validate_parallel_lists, validate_positive_amount,
};
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn add_product(state: &Arc<AppState>, p: AddProductParams) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.name, "name")?;
    validate_non_empty(&p.category, "category")?;
    validate_positive_amount(p.price, "price")?;
    validate_parallel_lists(
        p.ingredients_ids.len(),
        p.quantities.len(),
        "ingredients_ids",
        "quantities",
    )?;
    if p.ingredients_ids.is_empty() {
        return Err(BridgeError::ValidationError {
            message: "A product needs at least one ingredient".to_string(),
        });
    }
    if p.toaster_space < 0 {
        return Err(BridgeError::ValidationError {
            message: format!("Invalid toaster space: {}", p.toaster_space),
        });
    }
    state.backend.add_product(
        &p.name,
        &p.category,
        p.price,
        &p.ingredients_ids,
        &p.quantities,
        p.toaster_space,
    )?;
    Ok(CommandOutput::unit(format!("Product '{}' added.", p.name)))
}

pub fn get_all_products(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let products = state.backend.get_all_products()?;
    CommandOutput::json("All products", &products)
}

pub fn get_all_toast_products(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let products = state.backend.get_all_toast_products()?;
    CommandOutput::json("Toastable products", &products)
}
