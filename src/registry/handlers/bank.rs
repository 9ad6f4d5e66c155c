#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::{BalanceChangeParams, BankWithdrawParams, TransactionFilterParams};
use crate::registry::validation::{validate_non_empty, validate_positive_amount};
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn withdraw(
    state: &Arc<AppState>,
    p: BalanceChangeParams,
) -> Result<CommandOutput, BridgeError> {
    validate_positive_amount(p.amount, "amount")?;
    state.backend.withdraw(p.user_id, p.amount)?;
    Ok(CommandOutput::unit(format!("Withdrew {:.2}.", p.amount)))
}

pub fn deposit(
    state: &Arc<AppState>,
    p: BalanceChangeParams,
) -> Result<CommandOutput, BridgeError> {
    validate_positive_amount(p.amount, "amount")?;
    state.backend.deposit(p.user_id, p.amount)?;
    Ok(CommandOutput::unit(format!("Deposited {:.2}.", p.amount)))
}

pub fn bank_withdraw(
    state: &Arc<AppState>,
    p: BankWithdrawParams,
) -> Result<CommandOutput, BridgeError> {
    validate_positive_amount(p.amount, "amount")?;
    validate_non_empty(&p.description, "description")?;
    state.backend.bank_withdraw(p.amount, &p.description)?;
    Ok(CommandOutput::unit(format!(
        "Withdrew {:.2} from the bank.",
        p.amount
    )))
}

pub fn get_bank(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let bank = state.backend.get_bank()?;
    CommandOutput::json("Bank balance", &bank)
}

pub fn get_bank_transaction(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let transactions = state.backend.get_bank_transaction()?;
    CommandOutput::json("Bank transactions", &transactions)
}

/// The filter applies only when BOTH user and type are present; a half-given
/// filter silently returns the full history. Long-standing behavior the
/// transaction pages rely on.
pub fn get_filtered_transaction(
    state: &Arc<AppState>,
    p: TransactionFilterParams,
) -> Result<CommandOutput, BridgeError> {
    let user_id = p.user_id.map(|id| id.to_string());
    let filter = match (&user_id, &p.tx_type) {
        (Some(user), Some(tx_type)) => Some((user.as_str(), tx_type.as_str())),
        _ => None,
    };
    let transactions = state.backend.get_filtered_transaction(filter)?;
    CommandOutput::json("Filtered transactions", &transactions)
}
