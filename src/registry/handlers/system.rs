#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::BridgeError;
use crate::events::LogLevel;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub fn ping(_state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    CommandOutput::json("pong", &"pong")
}

pub fn create_database(state: &Arc<AppState>) -> Result<CommandOutput, BridgeError> {
    state.backend.create_database()?;
    state
        .ui
        .log(LogLevel::Info, "Database schema created".to_string());
    Ok(CommandOutput::unit("Database created."))
}
