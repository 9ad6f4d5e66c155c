pub mod catalog;
pub mod execute;
pub mod handlers;
pub mod params;
pub mod validation;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ── Param types (used in Command enum) ──────────────────────────
use params::{
    AddIngredientParams, AddProductParams, AddToastRoundParams, AddUserParams, BalanceChangeParams,
    BankWithdrawParams, ChangePasswordParams, CreateBackupParams, DeleteBackupParams,
    ExecuteDeletionParams, LoginParams, MakePurchaseParams, RestockIngredientParams,
    RestockIngredientsParams, RestoreBackupParams, SubmitPfandReturnParams,
    TransactionFilterParams,
};

// ── Handler modules (dispatch targets) ──────────────────────────
use handlers::{backup, bank, deletion, ingredients, pfand, products, purchase, rounds, system, users};

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CommandCategory {
    System,
    Ingredients,
    Users,
    Bank,
    Products,
    Purchases,
    Toast,
    Pfand,
    Backups,
    Deletion,
}

impl CommandCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Ingredients => "ingredients",
            Self::Users => "users",
            Self::Bank => "bank",
            Self::Products => "products",
            Self::Purchases => "purchases",
            Self::Toast => "toast",
            Self::Pfand => "pfand",
            Self::Backups => "backups",
            Self::Deletion => "deletion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::System => "Health checks and database bootstrap",
            Self::Ingredients => "Ingredient CRUD and restocking",
            Self::Users => "User accounts, login, passwords",
            Self::Bank => "Balances, deposits, withdrawals, transaction history",
            Self::Products => "Product CRUD and toastable products",
            Self::Purchases => "Purchases and sales history",
            Self::Toast => "Toast rounds",
            Self::Pfand => "Deposit returns and history",
            Self::Backups => "Database backup, restore, delete",
            Self::Deletion => "Soft-deletion of users, products, ingredients",
        }
    }

    pub fn all() -> &'static [CommandCategory] {
        &[
            Self::System,
            Self::Ingredients,
            Self::Users,
            Self::Bank,
            Self::Products,
            Self::Purchases,
            Self::Toast,
            Self::Pfand,
            Self::Backups,
            Self::Deletion,
        ]
    }
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    /// Whether the command changes backend state (vs. a pure query).
    pub mutating: bool,
}

// ── Command output ──────────────────────────────────────────────

/// Internal result of executing a Command. The payload is always a
/// JSON-serialized string (never a native value), or `None` for void
/// operations — the null-success marker on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub message: String,
    pub payload: Option<String>,
}

impl CommandOutput {
    /// Void success: message only, null payload.
    pub fn unit(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    /// Success carrying data, JSON-serialized at the boundary.
    pub fn json<T: Serialize>(
        message: impl Into<String>,
        value: &T,
    ) -> Result<Self, crate::error::BridgeError> {
        let payload =
            serde_json::to_string(value).map_err(|e| crate::error::BridgeError::BackendError {
                message: format!("Failed to serialize result: {e}"),
            })?;
        Ok(Self {
            message: message.into(),
            payload: Some(payload),
        })
    }
}

// ── define_commands! macro ──────────────────────────────────────

/// Single source of truth for all commands. Generates 5 artifacts:
/// 1. `Command` enum (serde-tagged, ts-rs exported)
/// 2. `Command::info()` — metadata (name, description, category, mutating)
/// 3. `Command::dispatch()` — execute against the shared state
/// 4. `Command::registry_entries()` — catalog entries with JSON schemas and
///    the derived required-argument lists
/// 5. `Command::from_call()` — lookup + required-argument check + typed
///    deserialization from a (name, JSON args) pair
macro_rules! define_commands {
    (
        params {
            $(
                [ $pc:expr $(, $pf:ident)* ]
                $pv:ident ( $pp:ty )
                => $ph:path, $pn:literal : $pd:literal ;
            )*
        }
        no_params {
            $(
                [ $nc:expr $(, $nf:ident)* ]
                $nv:ident
                => $nh:path, $nn:literal : $nd:literal ;
            )*
        }
    ) => {
        // ── 1. Command enum ──
        /// Unified command type. Every surface (form endpoint, REST, CLI)
        /// dispatches through the same executor. Adding a variant causes
        /// compiler errors until it's fully handled.
        #[derive(Debug, Clone, Serialize, Deserialize, TS)]
        #[ts(export)]
        #[serde(tag = "command", content = "params")]
        pub enum Command {
            $( $pv($pp), )*
            $( $nv, )*
        }

        // ── 2. Command::info() ──
        impl Command {
            pub fn info(&self) -> CommandInfo {
                match self {
                    $( Command::$pv(_) => CommandInfo {
                        name: $pn,
                        description: $pd,
                        category: $pc,
                        mutating: define_commands!(@has_flag mutating; $($pf)*),
                    }, )*
                    $( Command::$nv => CommandInfo {
                        name: $nn,
                        description: $nd,
                        category: $nc,
                        mutating: define_commands!(@has_flag mutating; $($nf)*),
                    }, )*
                }
            }
        }

        // ── 3. Command::dispatch() ──
        impl Command {
            pub(crate) fn dispatch(
                self,
                state: &std::sync::Arc<crate::state::AppState>,
            ) -> Result<CommandOutput, crate::error::BridgeError> {
                match self {
                    $( Command::$pv(p) => $ph(state, p), )*
                    $( Command::$nv => $nh(state), )*
                }
            }
        }

        // ── 4. Command::registry_entries() ──
        impl Command {
            pub(crate) fn registry_entries() -> Vec<catalog::CommandRegistryEntry> {
                vec![
                    $( catalog::entry(
                        CommandInfo {
                            name: $pn,
                            description: $pd,
                            category: $pc,
                            mutating: define_commands!(@has_flag mutating; $($pf)*),
                        },
                        catalog::schema_value::<$pp>(),
                    ), )*
                    $( catalog::entry(
                        CommandInfo {
                            name: $nn,
                            description: $nd,
                            category: $nc,
                            mutating: define_commands!(@has_flag mutating; $($nf)*),
                        },
                        catalog::empty_object_schema(),
                    ), )*
                ]
            }
        }

        // ── 5. Command::from_call() ──
        impl Command {
            pub(crate) fn from_call(
                name: &str,
                args: &serde_json::Value,
            ) -> Result<Command, crate::error::BridgeError> {
                match name {
                    $( $pn => {
                        catalog::check_required::<$pp>($pn, args)?;
                        Ok(Command::$pv(catalog::de($pn, args)?))
                    } )*
                    $( $nn => Ok(Command::$nv), )*
                    _ => Err(crate::error::BridgeError::NotImplemented {
                        command: name.to_string(),
                    }),
                }
            }
        }
    };

    // Flag helpers — check whether a specific flag appears in a list of flags.
    // Literal tokens match before metavariables, so `mutating` matches the
    // first arm and any other ident falls through to the recursive second arm.
    (@has_flag mutating; mutating $($rest:ident)*) => { true };
    (@has_flag mutating; $_other:ident $($rest:ident)*) => { define_commands!(@has_flag mutating; $($rest)*) };
    (@has_flag mutating;) => { false };
}

// ── Command definitions ─────────────────────────────────────────

define_commands! {
    params {
        // ── Ingredients (3) ─────────────────────────────────────
        [CommandCategory::Ingredients, mutating]
        AddIngredient(AddIngredientParams)
        => ingredients::add_ingredient, "add_ingredient": "Create an ingredient with package price, stock and optional deposit.";

        [CommandCategory::Ingredients, mutating]
        RestockIngredient(RestockIngredientParams)
        => ingredients::restock_ingredient, "restock_ingredient": "Increase the stock of one ingredient.";

        [CommandCategory::Ingredients, mutating]
        RestockIngredients(RestockIngredientsParams)
        => ingredients::restock_ingredients, "restock_ingredients": "Restock several ingredients in one call.";

        // ── Users (3) ───────────────────────────────────────────
        [CommandCategory::Users, mutating]
        AddUser(AddUserParams)
        => users::add_user, "add_user": "Create a user with an initial balance and role.";

        [CommandCategory::Users]
        Login(LoginParams)
        => users::login, "login": "Authenticate a user. Returns the session payload.";

        [CommandCategory::Users, mutating]
        ChangePassword(ChangePasswordParams)
        => users::change_password, "change_password": "Change a user's password after verifying the old one.";

        // ── Bank (4) ────────────────────────────────────────────
        [CommandCategory::Bank, mutating]
        Withdraw(BalanceChangeParams)
        => bank::withdraw, "withdraw": "Withdraw an amount from a user's balance.";

        [CommandCategory::Bank, mutating]
        Deposit(BalanceChangeParams)
        => bank::deposit, "deposit": "Deposit an amount onto a user's balance.";

        [CommandCategory::Bank, mutating]
        BankWithdraw(BankWithdrawParams)
        => bank::bank_withdraw, "bank_withdraw": "Withdraw cash from the shared bank with a reason.";

        [CommandCategory::Bank]
        GetFilteredTransaction(TransactionFilterParams)
        => bank::get_filtered_transaction, "get_filtered_transaction": "Transaction history, filtered only when both user and type are given.";

        // ── Products (1) ────────────────────────────────────────
        [CommandCategory::Products, mutating]
        AddProduct(AddProductParams)
        => products::add_product, "add_product": "Create a product from an ingredient list with per-ingredient quantities.";

        // ── Purchases (1) ───────────────────────────────────────
        [CommandCategory::Purchases, mutating]
        MakePurchase(MakePurchaseParams)
        => purchase::make_purchase, "make_purchase": "Charge a user for a quantity of one product.";

        // ── Toast (1) ───────────────────────────────────────────
        [CommandCategory::Toast, mutating]
        AddToastRound(AddToastRoundParams)
        => rounds::add_toast_round, "add_toast_round": "Record a toast round: products with consumer and donator per slot.";

        // ── Pfand (1) ───────────────────────────────────────────
        [CommandCategory::Pfand, mutating]
        SubmitPfandReturn(SubmitPfandReturnParams)
        => pfand::submit_pfand_return, "submit_pfand_return": "Credit a user for returned deposit items.";

        // ── Backups (3) ─────────────────────────────────────────
        [CommandCategory::Backups, mutating]
        CreateBackup(CreateBackupParams)
        => backup::create_backup, "create_backup": "Create a database backup. Returns the backup metadata.";

        [CommandCategory::Backups, mutating]
        RestoreBackup(RestoreBackupParams)
        => backup::restore_backup, "restore_backup": "Restore a backup. Requires explicit confirmation.";

        [CommandCategory::Backups, mutating]
        DeleteBackup(DeleteBackupParams)
        => backup::delete_backup, "delete_backup": "Delete a backup file by name.";

        // ── Deletion (1) ────────────────────────────────────────
        [CommandCategory::Deletion, mutating]
        ExecuteDeletion(ExecuteDeletionParams)
        => deletion::execute_deletion, "execute_deletion": "Soft-delete a user, product, or ingredient.";
    }
    no_params {
        // ── System (2) ──────────────────────────────────────────
        [CommandCategory::System]
        Ping => system::ping, "ping": "Health check. Returns \"pong\".";

        [CommandCategory::System, mutating]
        CreateDatabase => system::create_database, "create_database": "Create the database schema if it does not exist.";

        // ── Queries (10) ────────────────────────────────────────
        [CommandCategory::Ingredients]
        GetAllIngredients => ingredients::get_all_ingredients, "get_all_ingredients": "List all ingredients.";

        [CommandCategory::Users]
        GetAllUsers => users::get_all_users, "get_all_users": "List all users.";

        [CommandCategory::Bank]
        GetBank => bank::get_bank, "get_bank": "Get the shared bank balance.";

        [CommandCategory::Bank]
        GetBankTransaction => bank::get_bank_transaction, "get_bank_transaction": "Full bank transaction history.";

        [CommandCategory::Products]
        GetAllProducts => products::get_all_products, "get_all_products": "List all products.";

        [CommandCategory::Products]
        GetAllToastProducts => products::get_all_toast_products, "get_all_toast_products": "List products that fit in the toaster.";

        [CommandCategory::Purchases]
        GetAllSales => purchase::get_all_sales, "get_all_sales": "List all recorded sales.";

        [CommandCategory::Toast]
        GetAllToastRounds => rounds::get_all_toast_rounds, "get_all_toast_rounds": "List all recorded toast rounds.";

        [CommandCategory::Pfand]
        GetPfandHistory => pfand::get_pfand_history, "get_pfand_history": "List all deposit returns.";

        [CommandCategory::Backups]
        ListBackups => backup::list_backups, "list_backups": "List available backups.";
    }
}
