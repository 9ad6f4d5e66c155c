use std::fmt;

use serde::Serialize;
use ts_rs::TS;

/// Structured error type for the bridge. Replaces stringly-typed errors
/// so the frontend can match on error codes and display appropriate UI.
///
/// Every error is terminal for the action that triggered it and is surfaced
/// as a user-visible notification; nothing is retried automatically.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "code", content = "detail")]
#[ts(export)]
pub enum BridgeError {
    /// The command name is not in the registry.
    NotImplemented { command: String },
    /// A required argument was missing or an argument failed to decode.
    /// Rejected before the backend is reached.
    ArgumentError { message: String },
    /// Client-side selection-state rule violation.
    ValidationError { message: String },
    /// The entity is already present in a selection set.
    DuplicateError { what: String },
    /// An exception surfaced from the backend; the message is passed through.
    BackendError { message: String },
    /// Transport failure talking to an HTTP endpoint.
    NetworkError { message: String },
    IoError { message: String },
}

impl BridgeError {
    /// Stable kind string used in failure envelopes and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::NotImplemented { .. } => "not_implemented",
            BridgeError::ArgumentError { .. } => "argument_error",
            BridgeError::ValidationError { .. } => "validation_error",
            BridgeError::DuplicateError { .. } => "duplicate_error",
            BridgeError::BackendError { .. } => "backend_error",
            BridgeError::NetworkError { .. } => "network_error",
            BridgeError::IoError { .. } => "io_error",
        }
    }

    /// Shorthand for the common "Missing argument for <command>" rejection.
    pub fn missing_argument(command: &str) -> Self {
        BridgeError::ArgumentError {
            message: format!("Missing argument for {command}"),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NotImplemented { command } => {
                write!(f, "Unknown command: {command}")
            }
            BridgeError::ArgumentError { message } => write!(f, "{message}"),
            BridgeError::ValidationError { message } => write!(f, "{message}"),
            BridgeError::DuplicateError { what } => write!(f, "{what} already added."),
            BridgeError::BackendError { message } => write!(f, "Backend error: {message}"),
            BridgeError::NetworkError { message } => write!(f, "Network error: {message}"),
            BridgeError::IoError { message } => write!(f, "I/O error: {message}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        BridgeError::NetworkError {
            message: e.to_string(),
        }
    }
}

impl From<crate::backend::BackendError> for BridgeError {
    fn from(e: crate::backend::BackendError) -> Self {
        BridgeError::BackendError { message: e.message }
    }
}

impl From<crate::persist::PersistError> for BridgeError {
    fn from(e: crate::persist::PersistError) -> Self {
        match e {
            crate::persist::PersistError::Io(io_err) => BridgeError::IoError {
                message: io_err.to_string(),
            },
            crate::persist::PersistError::Json(json_err) => BridgeError::ValidationError {
                message: json_err.to_string(),
            },
        }
    }
}

/// Allow converting BridgeError to String for legacy popup surfaces.
impl From<BridgeError> for String {
    fn from(e: BridgeError) -> String {
        e.to_string()
    }
}

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::ValidationError { message: s }
    }
}

impl From<&str> for BridgeError {
    fn from(s: &str) -> Self {
        BridgeError::ValidationError {
            message: s.to_string(),
        }
    }
}
