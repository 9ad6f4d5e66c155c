use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::error::BridgeError;
use crate::state::AppState;

use super::{Command, CommandOutput};

/// The public result envelope every caller sees. Success carries the
/// human-readable message and the JSON-string payload (or none, the
/// null-success marker); failure carries the structured error.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "status", rename_all = "lowercase")]
#[ts(export)]
pub enum CommandResult {
    Ok {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<String>,
    },
    Error {
        error: BridgeError,
    },
}

impl CommandResult {
    pub fn success(output: CommandOutput) -> Self {
        CommandResult::Ok {
            message: output.message,
            payload: output.payload,
        }
    }

    pub fn failure(error: BridgeError) -> Self {
        CommandResult::Error { error }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResult::Ok { .. })
    }

    /// The text a popup would show for this result.
    pub fn message(&self) -> String {
        match self {
            CommandResult::Ok { message, .. } => message.clone(),
            CommandResult::Error { error } => error.to_string(),
        }
    }
}

/// Execute an already-typed Command against the application state.
/// This is the single dispatch point for all surfaces (forms, REST, CLI).
pub fn execute(state: &Arc<AppState>, cmd: Command) -> Result<CommandOutput, BridgeError> {
    cmd.dispatch(state)
}

/// The bridge entry point: name + raw JSON args in, result envelope out.
///
/// Argument validation happens before the backend is touched; a panic inside
/// the backend is caught here so one bad handler cannot take the bridge down.
pub fn dispatch_call(state: &Arc<AppState>, name: &str, args: &serde_json::Value) -> CommandResult {
    let command = match Command::from_call(name, args) {
        Ok(command) => command,
        Err(e) => return CommandResult::failure(e),
    };

    match catch_unwind(AssertUnwindSafe(|| execute(state, command))) {
        Ok(Ok(output)) => CommandResult::success(output),
        Ok(Err(e)) => CommandResult::failure(e),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            eprintln!("[Chame] backend panicked in '{name}': {message}");
            CommandResult::failure(BridgeError::BackendError { message })
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::demo::{CallLog, MemoryBackend};
    use crate::reverse::UiLink;

    fn test_state() -> (Arc<AppState>, CallLog) {
        let (ui, _rx) = UiLink::channel();
        let backend = MemoryBackend::new();
        let calls = backend.call_log();
        let state = Arc::new(AppState::new(
            Box::new(backend),
            ui,
            std::env::temp_dir().join("chame_test_execute"),
        ));
        (state, calls)
    }

    #[test]
    fn unknown_command_is_not_implemented() {
        let (state, _calls) = test_state();
        let result = dispatch_call(&state, "no_such_command", &serde_json::json!({}));
        match result {
            CommandResult::Error { error } => {
                assert_eq!(error.kind(), "not_implemented");
            }
            CommandResult::Ok { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn missing_argument_never_reaches_the_backend() {
        let (state, calls) = test_state();
        let result = dispatch_call(&state, "withdraw", &serde_json::json!({"user_id": 1}));
        match result {
            CommandResult::Error { error } => {
                assert_eq!(error.to_string(), "Missing argument for withdraw");
            }
            CommandResult::Ok { .. } => panic!("expected failure"),
        }
        // The backend saw no call at all.
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn ping_round_trip() {
        let (state, _calls) = test_state();
        let result = dispatch_call(&state, "ping", &serde_json::json!({}));
        match result {
            CommandResult::Ok { payload, .. } => {
                assert_eq!(payload.as_deref(), Some("\"pong\""));
            }
            CommandResult::Error { error } => panic!("ping failed: {error}"),
        }
    }

    #[test]
    fn void_success_has_null_payload() {
        let (state, _calls) = test_state();
        let result = dispatch_call(
            &state,
            "withdraw",
            &serde_json::json!({"user_id": 1, "amount": 5.0}),
        );
        match result {
            CommandResult::Ok { payload, .. } => assert!(payload.is_none()),
            CommandResult::Error { error } => panic!("withdraw failed: {error}"),
        }
    }

    #[test]
    fn query_payload_is_a_json_string() {
        let (state, _calls) = test_state();
        let result = dispatch_call(&state, "get_all_users", &serde_json::json!({}));
        match result {
            CommandResult::Ok { payload, .. } => {
                let payload = payload.expect("query should carry a payload");
                // The payload is a string that itself parses as JSON.
                let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
                assert!(parsed.is_array());
            }
            CommandResult::Error { error } => panic!("get_all_users failed: {error}"),
        }
    }

    #[test]
    fn defaults_reach_the_backend() {
        let (state, calls) = test_state();
        let result = dispatch_call(
            &state,
            "add_user",
            &serde_json::json!({"name": "carol", "balance": 0, "role": "member"}),
        );
        assert!(result.is_ok(), "{}", result.message());

        let call = calls
            .lock()
            .iter()
            .find(|c| c.starts_with("add_user"))
            .cloned()
            .expect("backend should have been called");
        // Password defaulted to the empty string.
        assert_eq!(call, "add_user(carol, 0, member, \"\")");
    }

    #[test]
    fn backend_errors_pass_through_verbatim() {
        let (state, _calls) = test_state();
        let result = dispatch_call(
            &state,
            "login",
            &serde_json::json!({"user": "nobody", "password": "wrong"}),
        );
        match result {
            CommandResult::Error { error } => {
                assert_eq!(error.kind(), "backend_error");
            }
            CommandResult::Ok { .. } => panic!("expected login failure"),
        }
    }
}
