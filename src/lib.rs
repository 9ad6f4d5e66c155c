//! Chame admin bridge: the command boundary between the admin UI and the
//! backend, plus the legacy form endpoints, the reverse channel back to the
//! UI, and the small UI-side models (notifications, selection, toast slots).

pub mod api;
pub mod backend;
pub mod demo;
pub mod error;
pub mod events;
pub mod files;
pub mod notify;
pub mod paths;
pub mod persist;
pub mod registry;
pub mod reverse;
pub mod selection;
pub mod settings;
pub mod state;
pub mod submit;
pub mod toast;
