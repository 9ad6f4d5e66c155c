#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::registry::params::{AddUserParams, ChangePasswordParams, LoginParams};
use crate::registry::validation::validate_non_empty;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn add_user(state: &Arc<AppState>, p: AddUserParams) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.name, "name")?;
    validate_non_empty(&p.role, "role")?;
    // An empty password is passed through as-is; whether that is allowed for
    // the role is the backend's call.
    state
        .backend
        .add_user(&p.name, p.balance, &p.role, &p.password)?;
    Ok(CommandOutput::unit(format!("User '{}' added.", p.name)))
}

pub fn get_all_users(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    let users = state.backend.get_all_users()?;
    CommandOutput::json("All users", &users)
}

pub fn login(state: &Arc<AppState>, p: LoginParams) -> Result<CommandOutput, BridgeError> {
    let session = state.backend.login(&p.user, &p.password)?;
    CommandOutput::json(format!("Logged in as {}", p.user), &session)
}

pub fn change_password(
    state: &Arc<AppState>,
    p: ChangePasswordParams,
) -> Result<CommandOutput, BridgeError> {
    validate_non_empty(&p.new_password, "new_password")?;
    state
        .backend
        .change_password(p.user_id, &p.old_password, &p.new_password)?;
    Ok(CommandOutput::unit("Password changed."))
}
