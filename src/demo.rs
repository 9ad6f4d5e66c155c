//! In-memory demo backend.
//!
//! Stands in for the real store behind the bridge: enough behavior to run the
//! binaries and exercise every command end to end, plus a call log so tests
//! can assert exactly what crossed the boundary (and what never did).

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{Backend, BackendError, EntityKind, PfandReturnItem, RestockEntry};

/// Shared handle to the backend call log. Entries are one line per boundary
/// crossing, formatted as `name(arg, arg, ...)`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, Serialize)]
struct DemoUser {
    id: i64,
    name: String,
    balance: f64,
    role: String,
    #[serde(skip)]
    password: String,
    deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
struct DemoIngredient {
    id: i64,
    name: String,
    price_per_package: f64,
    stock_quantity: i64,
    number_ingredients: i64,
    pfand: f64,
    deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
struct DemoProduct {
    id: i64,
    name: String,
    category: String,
    price: f64,
    ingredients_ids: Vec<i64>,
    quantities: Vec<f64>,
    toaster_space: i64,
    /// Deposit refunded when the container comes back.
    pfand: f64,
    deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
struct DemoSale {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    total: f64,
}

#[derive(Debug, Clone, Serialize)]
struct DemoToastRound {
    id: i64,
    product_ids: Vec<i64>,
    consumer_selections: Vec<i64>,
    donator_selections: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct DemoTransaction {
    id: i64,
    user_id: Option<i64>,
    tx_type: String,
    amount: f64,
    description: String,
}

#[derive(Debug, Clone, Serialize)]
struct DemoPfandReturn {
    id: i64,
    user_id: i64,
    items: Vec<PfandReturnItem>,
    credited: f64,
}

#[derive(Debug, Clone, Serialize)]
struct DemoBackup {
    filename: String,
    backup_type: String,
    description: String,
    created_by: String,
}

#[derive(Default)]
struct Inner {
    users: Vec<DemoUser>,
    ingredients: Vec<DemoIngredient>,
    products: Vec<DemoProduct>,
    sales: Vec<DemoSale>,
    toast_rounds: Vec<DemoToastRound>,
    transactions: Vec<DemoTransaction>,
    pfand_returns: Vec<DemoPfandReturn>,
    backups: Vec<DemoBackup>,
    bank_balance: f64,
    next_id: i64,
}

impl Inner {
    fn fresh_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MemoryBackend {
    inner: Mutex<Inner>,
    calls: CallLog,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Backend pre-seeded with a small cafeteria: two users, a few
    /// ingredients, toastable products and a deposit-bearing drink.
    pub fn new() -> Self {
        let mut inner = Inner {
            bank_balance: 100.0,
            ..Inner::default()
        };

        for (name, balance, role, password) in [
            ("alice", 50.0, "member", ""),
            ("bob", 20.0, "admin", "admin"),
        ] {
            let id = inner.fresh_id();
            inner.users.push(DemoUser {
                id,
                name: name.to_string(),
                balance,
                role: role.to_string(),
                password: password.to_string(),
                deleted: false,
            });
        }

        let seed_ingredient = |inner: &mut Inner, name: &str, price, stock, portions| {
            let id = inner.fresh_id();
            inner.ingredients.push(DemoIngredient {
                id,
                name: name.to_string(),
                price_per_package: price,
                stock_quantity: stock,
                number_ingredients: portions,
                pfand: 0.0,
                deleted: false,
            });
            id
        };
        let toast_id = seed_ingredient(&mut inner, "Toast", 2.0, 40, 20);
        let cheese_id = seed_ingredient(&mut inner, "Cheese", 4.5, 30, 15);
        let ham_id = seed_ingredient(&mut inner, "Ham", 3.0, 25, 10);
        for (name, category, price, ids, quantities, space, pfand) in [
            (
                "Cheese Toast",
                "toast",
                1.0,
                vec![toast_id, cheese_id],
                vec![2.0, 1.0],
                1,
                0.0,
            ),
            (
                "Ham & Cheese Toast",
                "toast",
                1.5,
                vec![toast_id, cheese_id, ham_id],
                vec![2.0, 1.0, 1.0],
                2,
                0.0,
            ),
            ("Club-Mate", "drink", 1.5, vec![], vec![], 0, 0.25),
        ] {
            let id = inner.fresh_id();
            inner.products.push(DemoProduct {
                id,
                name: name.to_string(),
                category: category.to_string(),
                price,
                ingredients_ids: ids,
                quantities,
                toaster_space: space,
                pfand,
                deleted: false,
            });
        }

        Self {
            inner: Mutex::new(inner),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the call log, for asserting boundary traffic in tests.
    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, BackendError> {
    serde_json::to_value(value).map_err(|e| BackendError::new(e.to_string()))
}

impl Backend for MemoryBackend {
    fn create_database(&self) -> Result<(), BackendError> {
        self.record("create_database()".to_string());
        Ok(())
    }

    fn add_ingredient(
        &self,
        name: &str,
        price_per_package: f64,
        stock_quantity: i64,
        number_ingredients: i64,
        pfand: f64,
    ) -> Result<(), BackendError> {
        self.record(format!(
            "add_ingredient({name}, {price_per_package}, {stock_quantity}, {number_ingredients}, {pfand})"
        ));
        let mut inner = self.inner.lock();
        if inner.ingredients.iter().any(|i| !i.deleted && i.name == name) {
            return Err(BackendError::new(format!(
                "Ingredient '{name}' already exists"
            )));
        }
        let id = inner.fresh_id();
        inner.ingredients.push(DemoIngredient {
            id,
            name: name.to_string(),
            price_per_package,
            stock_quantity,
            number_ingredients,
            pfand,
            deleted: false,
        });
        Ok(())
    }

    fn restock_ingredient(&self, ingredient_id: i64, quantity: i64) -> Result<(), BackendError> {
        self.record(format!("restock_ingredient({ingredient_id}, {quantity})"));
        let mut inner = self.inner.lock();
        let ingredient = inner
            .ingredients
            .iter_mut()
            .find(|i| i.id == ingredient_id && !i.deleted)
            .ok_or_else(|| BackendError::new(format!("Ingredient {ingredient_id} not found")))?;
        ingredient.stock_quantity += quantity;
        Ok(())
    }

    fn restock_ingredients(&self, restocks: &[RestockEntry]) -> Result<(), BackendError> {
        self.record(format!("restock_ingredients({} entries)", restocks.len()));
        let mut inner = self.inner.lock();
        // Validate everything before touching anything.
        for entry in restocks {
            if !inner
                .ingredients
                .iter()
                .any(|i| i.id == entry.id && !i.deleted)
            {
                return Err(BackendError::new(format!(
                    "Ingredient {} not found",
                    entry.id
                )));
            }
        }
        for entry in restocks {
            if let Some(ingredient) = inner.ingredients.iter_mut().find(|i| i.id == entry.id) {
                ingredient.stock_quantity += entry.restock;
            }
        }
        Ok(())
    }

    fn get_all_ingredients(&self) -> Result<Value, BackendError> {
        self.record("get_all_ingredients()".to_string());
        let inner = self.inner.lock();
        let visible: Vec<&DemoIngredient> =
            inner.ingredients.iter().filter(|i| !i.deleted).collect();
        to_value(&visible)
    }

    fn add_user(
        &self,
        name: &str,
        balance: f64,
        role: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        self.record(format!("add_user({name}, {balance}, {role}, {password:?})"));
        let mut inner = self.inner.lock();
        if inner.users.iter().any(|u| !u.deleted && u.name == name) {
            return Err(BackendError::new(format!("User '{name}' already exists")));
        }
        let id = inner.fresh_id();
        inner.users.push(DemoUser {
            id,
            name: name.to_string(),
            balance,
            role: role.to_string(),
            password: password.to_string(),
            deleted: false,
        });
        Ok(())
    }

    fn get_all_users(&self) -> Result<Value, BackendError> {
        self.record("get_all_users()".to_string());
        let inner = self.inner.lock();
        let visible: Vec<&DemoUser> = inner.users.iter().filter(|u| !u.deleted).collect();
        to_value(&visible)
    }

    fn login(&self, user: &str, password: &str) -> Result<Value, BackendError> {
        self.record(format!("login({user})"));
        let inner = self.inner.lock();
        let found = inner
            .users
            .iter()
            .find(|u| !u.deleted && u.name == user && u.password == password)
            .ok_or_else(|| BackendError::new("Invalid username or password"))?;
        Ok(serde_json::json!({
            "id": found.id,
            "name": found.name,
            "role": found.role,
        }))
    }

    fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), BackendError> {
        self.record(format!("change_password({user_id})"));
        let mut inner = self.inner.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && !u.deleted)
            .ok_or_else(|| BackendError::new(format!("User {user_id} not found")))?;
        if user.password != old_password {
            return Err(BackendError::new("Old password does not match"));
        }
        user.password = new_password.to_string();
        Ok(())
    }

    fn withdraw(&self, user_id: i64, amount: f64) -> Result<(), BackendError> {
        self.record(format!("withdraw({user_id}, {amount})"));
        let mut inner = self.inner.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && !u.deleted)
            .ok_or_else(|| BackendError::new(format!("User {user_id} not found")))?;
        if user.balance < amount {
            return Err(BackendError::new("Not enough balance"));
        }
        user.balance -= amount;
        let id = inner.fresh_id();
        inner.transactions.push(DemoTransaction {
            id,
            user_id: Some(user_id),
            tx_type: "withdraw".to_string(),
            amount,
            description: String::new(),
        });
        Ok(())
    }

    fn deposit(&self, user_id: i64, amount: f64) -> Result<(), BackendError> {
        self.record(format!("deposit({user_id}, {amount})"));
        let mut inner = self.inner.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && !u.deleted)
            .ok_or_else(|| BackendError::new(format!("User {user_id} not found")))?;
        user.balance += amount;
        let id = inner.fresh_id();
        inner.transactions.push(DemoTransaction {
            id,
            user_id: Some(user_id),
            tx_type: "deposit".to_string(),
            amount,
            description: String::new(),
        });
        Ok(())
    }

    fn bank_withdraw(&self, amount: f64, description: &str) -> Result<(), BackendError> {
        self.record(format!("bank_withdraw({amount}, {description})"));
        let mut inner = self.inner.lock();
        if inner.bank_balance < amount {
            return Err(BackendError::new("Not enough money in the bank"));
        }
        inner.bank_balance -= amount;
        let id = inner.fresh_id();
        inner.transactions.push(DemoTransaction {
            id,
            user_id: None,
            tx_type: "bank_withdraw".to_string(),
            amount,
            description: description.to_string(),
        });
        Ok(())
    }

    fn get_bank(&self) -> Result<Value, BackendError> {
        self.record("get_bank()".to_string());
        let inner = self.inner.lock();
        Ok(serde_json::json!({ "balance": inner.bank_balance }))
    }

    fn get_bank_transaction(&self) -> Result<Value, BackendError> {
        self.record("get_bank_transaction()".to_string());
        let inner = self.inner.lock();
        to_value(&inner.transactions)
    }

    fn get_filtered_transaction(
        &self,
        filter: Option<(&str, &str)>,
    ) -> Result<Value, BackendError> {
        self.record(format!("get_filtered_transaction({filter:?})"));
        let inner = self.inner.lock();
        match filter {
            None => to_value(&inner.transactions),
            Some((user, tx_type)) => {
                let user_id = user.trim().parse::<i64>().ok();
                let matching: Vec<&DemoTransaction> = inner
                    .transactions
                    .iter()
                    .filter(|t| t.user_id == user_id && t.tx_type == tx_type)
                    .collect();
                to_value(&matching)
            }
        }
    }

    fn add_product(
        &self,
        name: &str,
        category: &str,
        price: f64,
        ingredients_ids: &[i64],
        quantities: &[f64],
        toaster_space: i64,
    ) -> Result<(), BackendError> {
        self.record(format!(
            "add_product({name}, {category}, {price}, {ingredients_ids:?}, {quantities:?}, {toaster_space})"
        ));
        let mut inner = self.inner.lock();
        if inner.products.iter().any(|p| !p.deleted && p.name == name) {
            return Err(BackendError::new(format!("Product '{name}' already exists")));
        }
        for id in ingredients_ids {
            if !inner.ingredients.iter().any(|i| i.id == *id && !i.deleted) {
                return Err(BackendError::new(format!("Ingredient {id} not found")));
            }
        }
        let id = inner.fresh_id();
        inner.products.push(DemoProduct {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price,
            ingredients_ids: ingredients_ids.to_vec(),
            quantities: quantities.to_vec(),
            toaster_space,
            pfand: 0.0,
            deleted: false,
        });
        Ok(())
    }

    fn get_all_products(&self) -> Result<Value, BackendError> {
        self.record("get_all_products()".to_string());
        let inner = self.inner.lock();
        let visible: Vec<&DemoProduct> = inner.products.iter().filter(|p| !p.deleted).collect();
        to_value(&visible)
    }

    fn get_all_toast_products(&self) -> Result<Value, BackendError> {
        self.record("get_all_toast_products()".to_string());
        let inner = self.inner.lock();
        let toastable: Vec<&DemoProduct> = inner
            .products
            .iter()
            .filter(|p| !p.deleted && p.toaster_space >= 1)
            .collect();
        to_value(&toastable)
    }

    fn make_purchase(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<(), BackendError> {
        self.record(format!("make_purchase({user_id}, {product_id}, {quantity})"));
        let mut inner = self.inner.lock();
        #[allow(clippy::cast_precision_loss)]
        let total = {
            let product = inner
                .products
                .iter()
                .find(|p| p.id == product_id && !p.deleted)
                .ok_or_else(|| BackendError::new(format!("Product {product_id} not found")))?;
            product.price * quantity as f64
        };
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && !u.deleted)
            .ok_or_else(|| BackendError::new(format!("User {user_id} not found")))?;
        if user.balance < total {
            return Err(BackendError::new("Not enough balance"));
        }
        user.balance -= total;
        inner.bank_balance += total;
        let id = inner.fresh_id();
        inner.sales.push(DemoSale {
            id,
            user_id,
            product_id,
            quantity,
            total,
        });
        Ok(())
    }

    fn get_all_sales(&self) -> Result<Value, BackendError> {
        self.record("get_all_sales()".to_string());
        let inner = self.inner.lock();
        to_value(&inner.sales)
    }

    fn add_toast_round(
        &self,
        product_ids: &[i64],
        consumer_selections: &[i64],
        donator_selections: &[i64],
    ) -> Result<(), BackendError> {
        self.record(format!(
            "add_toast_round({product_ids:?}, {consumer_selections:?}, {donator_selections:?})"
        ));
        let mut inner = self.inner.lock();
        for id in product_ids {
            let product = inner
                .products
                .iter()
                .find(|p| p.id == *id && !p.deleted)
                .ok_or_else(|| BackendError::new(format!("Product {id} not found")))?;
            if product.toaster_space < 1 {
                return Err(BackendError::new(format!(
                    "Product '{}' does not fit in the toaster",
                    product.name
                )));
            }
        }
        let id = inner.fresh_id();
        inner.toast_rounds.push(DemoToastRound {
            id,
            product_ids: product_ids.to_vec(),
            consumer_selections: consumer_selections.to_vec(),
            donator_selections: donator_selections.to_vec(),
        });
        Ok(())
    }

    fn get_all_toast_rounds(&self) -> Result<Value, BackendError> {
        self.record("get_all_toast_rounds()".to_string());
        let inner = self.inner.lock();
        to_value(&inner.toast_rounds)
    }

    fn submit_pfand_return(
        &self,
        user_id: i64,
        product_list: &[PfandReturnItem],
    ) -> Result<(), BackendError> {
        self.record(format!(
            "submit_pfand_return({user_id}, {} items)",
            product_list.len()
        ));
        let mut inner = self.inner.lock();
        let mut credited = 0.0;
        for item in product_list {
            let product = inner
                .products
                .iter()
                .find(|p| p.id == item.product_id && !p.deleted)
                .ok_or_else(|| {
                    BackendError::new(format!("Product {} not found", item.product_id))
                })?;
            #[allow(clippy::cast_precision_loss)]
            {
                credited += product.pfand * item.quantity as f64;
            }
        }
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id && !u.deleted)
            .ok_or_else(|| BackendError::new(format!("User {user_id} not found")))?;
        user.balance += credited;
        let id = inner.fresh_id();
        inner.pfand_returns.push(DemoPfandReturn {
            id,
            user_id,
            items: product_list.to_vec(),
            credited,
        });
        Ok(())
    }

    fn get_pfand_history(&self) -> Result<Value, BackendError> {
        self.record("get_pfand_history()".to_string());
        let inner = self.inner.lock();
        to_value(&inner.pfand_returns)
    }

    fn create_backup(
        &self,
        backup_type: &str,
        description: &str,
        created_by: &str,
    ) -> Result<Value, BackendError> {
        self.record(format!(
            "create_backup({backup_type}, {description:?}, {created_by})"
        ));
        let mut inner = self.inner.lock();
        let filename = format!("backup_{:04}.db", inner.backups.len() + 1);
        let backup = DemoBackup {
            filename,
            backup_type: backup_type.to_string(),
            description: description.to_string(),
            created_by: created_by.to_string(),
        };
        let value = to_value(&backup)?;
        inner.backups.push(backup);
        Ok(value)
    }

    fn list_backups(&self) -> Result<Value, BackendError> {
        self.record("list_backups()".to_string());
        let inner = self.inner.lock();
        to_value(&inner.backups)
    }

    fn restore_backup(&self, backup_path: &str, confirm: bool) -> Result<Value, BackendError> {
        self.record(format!("restore_backup({backup_path}, {confirm})"));
        if !confirm {
            return Err(BackendError::new("Restore not confirmed"));
        }
        let inner = self.inner.lock();
        let backup = inner
            .backups
            .iter()
            .find(|b| backup_path.ends_with(&b.filename))
            .ok_or_else(|| BackendError::new(format!("Backup not found: {backup_path}")))?;
        Ok(serde_json::json!({ "restored": backup.filename }))
    }

    fn delete_backup(&self, backup_filename: &str) -> Result<Value, BackendError> {
        self.record(format!("delete_backup({backup_filename})"));
        let mut inner = self.inner.lock();
        let index = inner
            .backups
            .iter()
            .position(|b| b.filename == backup_filename)
            .ok_or_else(|| BackendError::new(format!("Backup not found: {backup_filename}")))?;
        let removed = inner.backups.remove(index);
        Ok(serde_json::json!({ "deleted": removed.filename }))
    }

    fn execute_deletion(
        &self,
        entity_type: EntityKind,
        entity_id: i64,
        deleted_by: &str,
    ) -> Result<Value, BackendError> {
        self.record(format!(
            "execute_deletion({}, {entity_id}, {deleted_by})",
            entity_type.slug()
        ));
        let mut inner = self.inner.lock();
        let found = match entity_type {
            EntityKind::User => inner
                .users
                .iter_mut()
                .find(|u| u.id == entity_id && !u.deleted)
                .map_or(false, |u| {
                    u.deleted = true;
                    true
                }),
            EntityKind::Product => inner
                .products
                .iter_mut()
                .find(|p| p.id == entity_id && !p.deleted)
                .map_or(false, |p| {
                    p.deleted = true;
                    true
                }),
            EntityKind::Ingredient => inner
                .ingredients
                .iter_mut()
                .find(|i| i.id == entity_id && !i.deleted)
                .map_or(false, |i| {
                    i.deleted = true;
                    true
                }),
        };
        if !found {
            return Err(BackendError::new(format!(
                "{} {entity_id} not found",
                entity_type.slug()
            )));
        }
        Ok(serde_json::json!({
            "entity_type": entity_type.slug(),
            "entity_id": entity_id,
            "deleted_by": deleted_by,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn withdraw_checks_balance() {
        let backend = MemoryBackend::new();
        backend.withdraw(1, 10.0).unwrap();
        let err = backend.withdraw(1, 1000.0).unwrap_err();
        assert_eq!(err.message, "Not enough balance");
    }

    #[test]
    fn filtered_transactions_need_both_filters() {
        let backend = MemoryBackend::new();
        backend.deposit(1, 5.0).unwrap();
        backend.withdraw(2, 5.0).unwrap();

        let all = backend.get_filtered_transaction(None).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);

        let filtered = backend
            .get_filtered_transaction(Some(("1", "deposit")))
            .unwrap();
        let rows = filtered.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tx_type"], "deposit");
    }

    #[test]
    fn pfand_return_credits_deposit() {
        let backend = MemoryBackend::new();
        // Product 8 is the seeded Club-Mate with a 0.25 deposit.
        backend
            .submit_pfand_return(
                1,
                &[PfandReturnItem {
                    product_id: 8,
                    quantity: 4,
                }],
            )
            .unwrap();
        let users = backend.get_all_users().unwrap();
        let alice = &users.as_array().unwrap()[0];
        assert!((alice["balance"].as_f64().unwrap() - 51.0).abs() < 1e-9);
    }

    #[test]
    fn deletion_hides_entities_from_listings() {
        let backend = MemoryBackend::new();
        backend
            .execute_deletion(EntityKind::User, 1, "system")
            .unwrap();
        let users = backend.get_all_users().unwrap();
        assert_eq!(users.as_array().unwrap().len(), 1);
        // Deleting again fails: already gone.
        assert!(backend
            .execute_deletion(EntityKind::User, 1, "system")
            .is_err());
    }

    #[test]
    fn backups_round_trip() {
        let backend = MemoryBackend::new();
        let created = backend.create_backup("manual", "", "android_app").unwrap();
        let filename = created["filename"].as_str().unwrap().to_string();

        let listed = backend.list_backups().unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        assert!(backend.restore_backup(&filename, false).is_err());
        let restored = backend.restore_backup(&filename, true).unwrap();
        assert_eq!(restored["restored"], filename.as_str());

        backend.delete_backup(&filename).unwrap();
        assert!(backend.list_backups().unwrap().as_array().unwrap().is_empty());
    }
}
