#![allow(clippy::needless_pass_by_value)]

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use crate::error::BridgeError;

use super::{CommandCategory, CommandInfo};

/// A registry entry: metadata + JSON schema for the params + the required
/// argument names derived from that schema.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub mutating: bool,
    pub required: Vec<String>,
    pub param_schema: Value,
}

pub(super) fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub(super) fn schema_value<T: schemars::JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or(empty_object_schema())
}

/// Read the `required` array out of a params schema. Fields with serde
/// defaults are excluded by schemars, so this is exactly the set the bridge
/// must see in every call.
pub(super) fn required_fields(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    let required = required_fields(&param_schema);
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        category: info.category,
        mutating: info.mutating,
        required,
        param_schema,
    }
}

/// Reject the call before touching the backend if any declared required
/// argument is absent (or JSON null). The message is part of the bridge
/// contract, verbatim.
pub(super) fn check_required<T: schemars::JsonSchema>(
    command: &str,
    args: &Value,
) -> Result<(), BridgeError> {
    let schema = schema_value::<T>();
    for field in required_fields(&schema) {
        match args.get(&field) {
            Some(value) if !value.is_null() => {}
            _ => return Err(BridgeError::missing_argument(command)),
        }
    }
    Ok(())
}

pub(super) fn de<T: serde::de::DeserializeOwned>(
    command: &str,
    args: &Value,
) -> Result<T, BridgeError> {
    serde_json::from_value(args.clone()).map_err(|e| BridgeError::ArgumentError {
        message: format!("Invalid arguments for {command}: {e}"),
    })
}

/// The complete command registry, auto-generated from param struct schemas.
pub fn command_registry() -> Vec<CommandRegistryEntry> {
    super::Command::registry_entries()
}

/// Generate the JSON registry listing served at `GET /commands`.
pub fn to_json_schema() -> Value {
    Value::Array(
        command_registry()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "description": e.description,
                    "category": e.category.slug(),
                    "mutating": e.mutating,
                    "required": e.required,
                    "inputSchema": e.param_schema,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn find(name: &str) -> CommandRegistryEntry {
        command_registry()
            .into_iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("{name} not registered"))
    }

    #[test]
    fn every_command_has_a_unique_name() {
        let registry = command_registry();
        let mut names: Vec<&str> = registry.iter().map(|e| e.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn schemas_expose_exact_required_lists() {
        let withdraw = find("withdraw");
        let mut required = withdraw.required.clone();
        required.sort();
        assert_eq!(required, vec!["amount", "user_id"]);

        // Defaulted fields are optional.
        let ingredient = find("add_ingredient");
        assert!(!ingredient.required.contains(&"pfand".to_string()));
        assert!(ingredient.required.contains(&"name".to_string()));

        let user = find("add_user");
        assert!(!user.required.contains(&"password".to_string()));

        let backup = find("create_backup");
        assert!(backup.required.is_empty());

        // Query commands take no parameters at all.
        let ping = find("ping");
        assert!(ping.required.is_empty());
    }

    #[test]
    fn queries_are_not_mutating() {
        assert!(!find("get_all_users").mutating);
        assert!(!find("get_filtered_transaction").mutating);
        assert!(find("add_user").mutating);
        assert!(find("execute_deletion").mutating);
    }

    #[test]
    fn from_call_rejects_unknown_names() {
        let err = super::super::Command::from_call("frobnicate", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotImplemented { ref command } if command == "frobnicate"));
    }

    #[test]
    fn from_call_rejects_missing_required_arguments_verbatim() {
        let err = super::super::Command::from_call("withdraw", &serde_json::json!({"user_id": 1}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing argument for withdraw");

        // Explicit null counts as absent.
        let err = super::super::Command::from_call(
            "withdraw",
            &serde_json::json!({"user_id": 1, "amount": null}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing argument for withdraw");
    }
}
