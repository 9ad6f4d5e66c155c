use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::backend::{EntityKind, PfandReturnItem, RestockEntry};

// ── Loose argument coercion ─────────────────────────────────────

/// Serde helpers that accept a number or its string rendering for numeric
/// fields. Callers on the far side of the bridge serialize form inputs as
/// strings as often as numbers, so `7`, `7.0` and `"7"` must all decode to
/// the same argument.
pub mod loose {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Int(i64),
        Float(f64),
        Str(String),
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match NumOrStr::deserialize(deserializer)? {
            NumOrStr::Int(v) => Ok(v),
            NumOrStr::Float(v) => {
                if v.fract() == 0.0 && v.is_finite() {
                    #[allow(clippy::cast_possible_truncation)]
                    Ok(v as i64)
                } else {
                    Err(serde::de::Error::custom(format!(
                        "expected an integer, got {v}"
                    )))
                }
            }
            NumOrStr::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("expected an integer, got \"{s}\""))),
        }
    }

    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumOrStr::deserialize(deserializer)? {
            NumOrStr::Int(v) => {
                #[allow(clippy::cast_precision_loss)]
                Ok(v as f64)
            }
            NumOrStr::Float(v) => Ok(v),
            NumOrStr::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got \"{s}\""))),
        }
    }

    pub fn int_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        int(deserializer).map(Some)
    }
}

/// Serde helper for structured fields that may arrive as a JSON-encoded
/// string instead of a native array (the legacy callers double-encode
/// `restocks` and `product_list`).
pub mod json_encoded {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: serde::de::DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let decoded = match value {
            Value::String(s) => {
                serde_json::from_str::<Value>(&s).map_err(serde::de::Error::custom)?
            }
            other => other,
        };
        serde_json::from_value(decoded).map_err(serde::de::Error::custom)
    }
}

// ── Defaults ────────────────────────────────────────────────────

fn default_backup_type() -> String {
    "manual".to_string()
}

fn default_created_by() -> String {
    "android_app".to_string()
}

fn default_deleted_by() -> String {
    "system".to_string()
}

// ── Ingredient params ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AddIngredientParams {
    pub name: String,
    #[serde(deserialize_with = "loose::float")]
    pub price_per_package: f64,
    #[serde(deserialize_with = "loose::int")]
    pub stock_quantity: i64,
    /// Portions per package.
    #[serde(deserialize_with = "loose::int")]
    pub number_ingredients: i64,
    /// Deposit per unit. Defaults to no deposit.
    #[serde(default, deserialize_with = "loose::float")]
    pub pfand: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct RestockIngredientParams {
    #[serde(deserialize_with = "loose::int")]
    pub ingredient_id: i64,
    #[serde(deserialize_with = "loose::int")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct RestockIngredientsParams {
    /// Accepts a native array or its JSON-encoded string form.
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub restocks: Vec<RestockEntry>,
}

// ── User & session params ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AddUserParams {
    pub name: String,
    #[serde(deserialize_with = "loose::float")]
    pub balance: f64,
    pub role: String,
    /// Defaults to an empty password; the backend decides whether that is
    /// acceptable for the given role.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct LoginParams {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct ChangePasswordParams {
    #[serde(deserialize_with = "loose::int")]
    pub user_id: i64,
    pub old_password: String,
    pub new_password: String,
}

// ── Balance & bank params ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct BalanceChangeParams {
    #[serde(deserialize_with = "loose::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "loose::float")]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct BankWithdrawParams {
    #[serde(deserialize_with = "loose::float")]
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct TransactionFilterParams {
    #[serde(default, deserialize_with = "loose::int_opt")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub tx_type: Option<String>,
}

// ── Product params ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AddProductParams {
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "loose::float")]
    pub price: f64,
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub ingredients_ids: Vec<i64>,
    /// Parallel to `ingredients_ids`: portion count per ingredient.
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub quantities: Vec<f64>,
    /// Contiguous toaster slots this product occupies (0 = not toastable).
    #[serde(deserialize_with = "loose::int")]
    pub toaster_space: i64,
}

// ── Purchase & toast params ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct MakePurchaseParams {
    #[serde(deserialize_with = "loose::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "loose::int")]
    pub product_id: i64,
    #[serde(deserialize_with = "loose::int")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AddToastRoundParams {
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub product_ids: Vec<i64>,
    /// Parallel to `product_ids`: who eats each toast.
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub consumer_selections: Vec<i64>,
    /// Parallel to `product_ids`: who pays for each toast.
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub donator_selections: Vec<i64>,
}

// ── Pfand params ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SubmitPfandReturnParams {
    #[serde(deserialize_with = "loose::int")]
    pub user_id: i64,
    #[serde(deserialize_with = "json_encoded::deserialize")]
    pub product_list: Vec<PfandReturnItem>,
}

// ── Backup params ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct CreateBackupParams {
    #[serde(default = "default_backup_type")]
    pub backup_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct RestoreBackupParams {
    pub backup_path: String,
    /// A restore is destructive; it never proceeds unless explicitly confirmed.
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct DeleteBackupParams {
    pub backup_filename: String,
}

// ── Deletion params ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct ExecuteDeletionParams {
    pub entity_type: EntityKind,
    #[serde(deserialize_with = "loose::int")]
    pub entity_id: i64,
    #[serde(default = "default_deleted_by")]
    pub deleted_by: String,
}
