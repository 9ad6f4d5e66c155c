//! Dispatch targets for the command registry, one module per category.

pub mod backup;
pub mod bank;
pub mod deletion;
pub mod ingredients;
pub mod pfand;
pub mod products;
pub mod purchase;
pub mod rounds;
pub mod system;
pub mod users;
