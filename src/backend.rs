//! The opaque backend boundary.
//!
//! The bridge never owns business logic: ingredients, users, purchases,
//! backups and deletions all live behind this trait. Callers on the other
//! side of the bridge only ever see JSON strings or a null-success marker,
//! never the backend's native values — the trait returns `serde_json::Value`
//! for exactly that reason.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Error surfaced by a backend operation. The message is passed through to
/// the caller verbatim; the bridge converts it to `BridgeError::BackendError`
/// at the boundary.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for BackendError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// One entry of a bulk restock: which ingredient, and by how much.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct RestockEntry {
    pub id: i64,
    pub restock: i64,
}

/// One returned deposit item in a Pfand return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct PfandReturnItem {
    pub product_id: i64,
    #[serde(default = "default_return_quantity")]
    pub quantity: i64,
}

fn default_return_quantity() -> i64 {
    1
}

/// Entity kinds the deletion operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntityKind {
    User,
    Product,
    Ingredient,
}

impl EntityKind {
    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Product => "product",
            EntityKind::Ingredient => "ingredient",
        }
    }
}

/// The named operations the backend exposes. Arguments are already validated
/// and coerced by the registry before any of these is invoked.
///
/// Query operations return a JSON value the bridge serializes for transport;
/// void operations signal success with `Ok(())` (the null-success marker on
/// the wire).
pub trait Backend: Send + Sync {
    fn create_database(&self) -> Result<(), BackendError>;

    // ── Ingredients ─────────────────────────────────────────────
    fn add_ingredient(
        &self,
        name: &str,
        price_per_package: f64,
        stock_quantity: i64,
        number_ingredients: i64,
        pfand: f64,
    ) -> Result<(), BackendError>;
    fn restock_ingredient(&self, ingredient_id: i64, quantity: i64) -> Result<(), BackendError>;
    fn restock_ingredients(&self, restocks: &[RestockEntry]) -> Result<(), BackendError>;
    fn get_all_ingredients(&self) -> Result<Value, BackendError>;

    // ── Users & session ─────────────────────────────────────────
    fn add_user(
        &self,
        name: &str,
        balance: f64,
        role: &str,
        password: &str,
    ) -> Result<(), BackendError>;
    fn get_all_users(&self) -> Result<Value, BackendError>;
    fn login(&self, user: &str, password: &str) -> Result<Value, BackendError>;
    fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), BackendError>;

    // ── Balances & bank ─────────────────────────────────────────
    fn withdraw(&self, user_id: i64, amount: f64) -> Result<(), BackendError>;
    fn deposit(&self, user_id: i64, amount: f64) -> Result<(), BackendError>;
    fn bank_withdraw(&self, amount: f64, description: &str) -> Result<(), BackendError>;
    fn get_bank(&self) -> Result<Value, BackendError>;
    fn get_bank_transaction(&self) -> Result<Value, BackendError>;
    /// Filters apply only when both are given; otherwise the full history is
    /// returned (the original backend's both-or-neither behavior).
    fn get_filtered_transaction(
        &self,
        filter: Option<(&str, &str)>,
    ) -> Result<Value, BackendError>;

    // ── Products ────────────────────────────────────────────────
    #[allow(clippy::too_many_arguments)]
    fn add_product(
        &self,
        name: &str,
        category: &str,
        price: f64,
        ingredients_ids: &[i64],
        quantities: &[f64],
        toaster_space: i64,
    ) -> Result<(), BackendError>;
    fn get_all_products(&self) -> Result<Value, BackendError>;
    fn get_all_toast_products(&self) -> Result<Value, BackendError>;

    // ── Purchases & toast rounds ────────────────────────────────
    fn make_purchase(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), BackendError>;
    fn get_all_sales(&self) -> Result<Value, BackendError>;
    fn add_toast_round(
        &self,
        product_ids: &[i64],
        consumer_selections: &[i64],
        donator_selections: &[i64],
    ) -> Result<(), BackendError>;
    fn get_all_toast_rounds(&self) -> Result<Value, BackendError>;

    // ── Pfand ───────────────────────────────────────────────────
    fn submit_pfand_return(
        &self,
        user_id: i64,
        product_list: &[PfandReturnItem],
    ) -> Result<(), BackendError>;
    fn get_pfand_history(&self) -> Result<Value, BackendError>;

    // ── Backups ─────────────────────────────────────────────────
    fn create_backup(
        &self,
        backup_type: &str,
        description: &str,
        created_by: &str,
    ) -> Result<Value, BackendError>;
    fn list_backups(&self) -> Result<Value, BackendError>;
    fn restore_backup(&self, backup_path: &str, confirm: bool) -> Result<Value, BackendError>;
    fn delete_backup(&self, backup_filename: &str) -> Result<Value, BackendError>;

    // ── Deletion ────────────────────────────────────────────────
    fn execute_deletion(
        &self,
        entity_type: EntityKind,
        entity_id: i64,
        deleted_by: &str,
    ) -> Result<Value, BackendError>;
}
