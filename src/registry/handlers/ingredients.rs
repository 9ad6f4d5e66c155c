#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::{
    AddIngredientParams, RestockIngredientParams, RestockIngredientsParams,
};
use crate::registry::validation::{validate_non_empty, validate_positive_amount, validate_positive_count};
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn add_ingredient(
    state: &Arc<AppState>,
    p: AddIngredientParams,
) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.name, "name")?;
    validate_positive_amount(p.price_per_package, "price_per_package")?;
    validate_positive_count(p.number_ingredients, "number_ingredients")?;
    state.backend.add_ingredient(
        &p.name,
        p.price_per_package,
        p.stock_quantity,
        p.number_ingredients,
        p.pfand,
    )?;
    Ok(CommandOutput::unit(format!("Ingredient '{}' added.", p.name)))
}

pub fn restock_ingredient(
    state: &Arc<AppState>,
    p: RestockIngredientParams,
) -> Result<CommandOutput, BridgeError> {
    validate_positive_count(p.quantity, "quantity")?;
    state.backend.restock_ingredient(p.ingredient_id, p.quantity)?;
    Ok(CommandOutput::unit("Ingredient restocked."))
}

pub fn restock_ingredients(
    state: &Arc<AppState>,
    p: RestockIngredientsParams,
) -> Result<CommandOutput, BridgeError> {
    if p.restocks.is_empty() {
        return Err(BridgeError::ValidationError {
            message: "No restocks given".to_string(),
        });
    }
    state.backend.restock_ingredients(&p.restocks)?;
    Ok(CommandOutput::unit(format!(
        "{} ingredients restocked.",
        p.restocks.len()
    )))
}

pub fn get_all_ingredients(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let ingredients = state.backend.get_all_ingredients()?;
    CommandOutput::json("All ingredients", &ingredients)
}
