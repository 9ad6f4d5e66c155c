//! Client-held selection state pending form submission.
//!
//! A selection set is an ordered collection of chosen entities (ingredients,
//! users, products), unique by entity id. It lives only for the page session:
//! on every mutation the set is re-rendered into one hidden form field pair
//! per entry so the whole selection resubmits with the enclosing form.

use indexmap::IndexMap;
use serde::Serialize;
use ts_rs::TS;

use crate::error::BridgeError;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SelectionEntry {
    pub entity_id: String,
    pub display_name: String,
    pub quantity: u32,
    /// Cost of one unit, used for the derived running total.
    pub unit_cost: f64,
}

#[derive(Default)]
pub struct SelectionSet {
    entries: IndexMap<String, SelectionEntry>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Rejects empty ids, absent or zero quantities, and
    /// ids already present in the set.
    pub fn add(
        &mut self,
        entity_id: &str,
        display_name: &str,
        quantity: Option<u32>,
    ) -> Result<(), BridgeError> {
        self.add_with_cost(entity_id, display_name, quantity, 0.0)
    }

    pub fn add_with_cost(
        &mut self,
        entity_id: &str,
        display_name: &str,
        quantity: Option<u32>,
        unit_cost: f64,
    ) -> Result<(), BridgeError> {
        let quantity = match quantity {
            Some(q) if q >= 1 => q,
            _ => {
                return Err(BridgeError::ValidationError {
                    message: "Please select an entry and enter a valid quantity.".to_string(),
                })
            }
        };
        if entity_id.is_empty() {
            return Err(BridgeError::ValidationError {
                message: "Please select an entry and enter a valid quantity.".to_string(),
            });
        }
        if self.entries.contains_key(entity_id) {
            return Err(BridgeError::DuplicateError {
                what: display_name.to_string(),
            });
        }
        self.entries.insert(
            entity_id.to_string(),
            SelectionEntry {
                entity_id: entity_id.to_string(),
                display_name: display_name.to_string(),
                quantity,
                unit_cost,
            },
        );
        Ok(())
    }

    /// Remove the entry at `index`, preserving the relative order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<SelectionEntry> {
        self.entries.shift_remove_index(index).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Derived running total: sum of unit_cost × quantity over all entries.
    pub fn total_cost(&self) -> f64 {
        self.entries
            .values()
            .map(|e| e.unit_cost * f64::from(e.quantity))
            .sum()
    }

    /// Regenerate the hidden form field pairs, one per entry, in order.
    pub fn form_fields(&self, id_name: &str, qty_name: &str) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.entries.len() * 2);
        for entry in self.entries.values() {
            fields.push((id_name.to_string(), entry.entity_id.clone()));
            fields.push((qty_name.to_string(), entry.quantity.to_string()));
        }
        fields
    }

    /// Rebuild the set from previously-rendered hidden fields, e.g. after the
    /// page reloads with a validation error. `display` resolves an id back to
    /// its display name and unit cost; unresolvable or malformed pairs are
    /// skipped, matching the best-effort restore of the original page.
    pub fn restore<F>(
        fields: &[(String, String)],
        id_name: &str,
        qty_name: &str,
        display: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<(String, f64)>,
    {
        let ids = fields.iter().filter(|(k, _)| k == id_name).map(|(_, v)| v);
        let quantities = fields.iter().filter(|(k, _)| k == qty_name).map(|(_, v)| v);

        let mut set = Self::new();
        for (id, qty) in ids.zip(quantities) {
            let Some((name, cost)) = display(id) else {
                continue;
            };
            let quantity = qty.parse::<u32>().ok();
            let _ = set.add_with_cost(id, &name, quantity, cost);
        }
        set
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_empty_id_and_bad_quantity() {
        let mut set = SelectionSet::new();
        assert!(matches!(
            set.add("", "Flour", Some(2)),
            Err(BridgeError::ValidationError { .. })
        ));
        assert!(matches!(
            set.add("7", "Flour", None),
            Err(BridgeError::ValidationError { .. })
        ));
        assert!(matches!(
            set.add("7", "Flour", Some(0)),
            Err(BridgeError::ValidationError { .. })
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn duplicate_id_leaves_set_unchanged() {
        let mut set = SelectionSet::new();
        set.add("7", "Flour", Some(2)).unwrap();
        let err = set.add("7", "Flour", Some(5)).unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateError { .. }));
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries().next().unwrap().quantity, 2);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut set = SelectionSet::new();
        for (id, name) in [("1", "a"), ("2", "b"), ("3", "c"), ("4", "d")] {
            set.add(id, name, Some(1)).unwrap();
        }
        let removed = set.remove(1).unwrap();
        assert_eq!(removed.entity_id, "2");
        let ids: Vec<&str> = set.entries().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn total_cost_is_unit_cost_times_quantity() {
        let mut set = SelectionSet::new();
        set.add_with_cost("1", "Flour", Some(3), 0.50).unwrap();
        set.add_with_cost("2", "Cheese", Some(2), 1.25).unwrap();
        assert!((set.total_cost() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn form_fields_round_trip_through_restore() {
        let mut set = SelectionSet::new();
        set.add_with_cost("1", "Flour", Some(3), 0.50).unwrap();
        set.add_with_cost("9", "Cheese", Some(2), 1.25).unwrap();

        let fields = set.form_fields("ingredients[]", "quantities[]");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], ("ingredients[]".to_string(), "1".to_string()));
        assert_eq!(fields[1], ("quantities[]".to_string(), "3".to_string()));

        let restored = SelectionSet::restore(&fields, "ingredients[]", "quantities[]", |id| {
            match id {
                "1" => Some(("Flour".to_string(), 0.50)),
                "9" => Some(("Cheese".to_string(), 1.25)),
                _ => None,
            }
        });
        assert_eq!(restored.len(), 2);
        assert!((restored.total_cost() - set.total_cost()).abs() < 1e-9);
    }

    #[test]
    fn restore_skips_unresolvable_entries() {
        let fields = vec![
            ("ingredients[]".to_string(), "1".to_string()),
            ("quantities[]".to_string(), "3".to_string()),
            ("ingredients[]".to_string(), "404".to_string()),
            ("quantities[]".to_string(), "2".to_string()),
        ];
        let restored = SelectionSet::restore(&fields, "ingredients[]", "quantities[]", |id| {
            (id == "1").then(|| ("Flour".to_string(), 0.5))
        });
        assert_eq!(restored.len(), 1);
    }
}
