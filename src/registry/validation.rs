//! Shared validation helpers for registry command handlers.
//!
//! Centralizes common checks (amounts, names, parallel lists) so all handlers
//! produce consistent error messages.

use crate::error::BridgeError;

/// Validate that an amount is finite and strictly positive.
pub fn validate_positive_amount(amount: f64, name: &str) -> Result<(), BridgeError> {
    if !amount.is_finite() {
        return Err(BridgeError::ValidationError {
            message: format!("{name} must be finite"),
        });
    }
    if amount <= 0.0 {
        return Err(BridgeError::ValidationError {
            message: format!("{name} must be positive"),
        });
    }
    Ok(())
}

/// Validate that a count is at least one.
pub fn validate_positive_count(count: i64, name: &str) -> Result<(), BridgeError> {
    if count < 1 {
        return Err(BridgeError::ValidationError {
            message: format!("{name} must be at least 1"),
        });
    }
    Ok(())
}

/// Validate that a name is non-empty after trimming.
pub fn validate_non_empty(value: &str, name: &str) -> Result<(), BridgeError> {
    if value.trim().is_empty() {
        return Err(BridgeError::ValidationError {
            message: format!("{name} must not be empty"),
        });
    }
    Ok(())
}

/// Validate that two parallel lists have the same length.
pub fn validate_parallel_lists(
    left_len: usize,
    right_len: usize,
    left: &str,
    right: &str,
) -> Result<(), BridgeError> {
    if left_len != right_len {
        return Err(BridgeError::ValidationError {
            message: format!("{left} and {right} must have the same length"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive_and_finite() {
        assert!(validate_positive_amount(0.01, "amount").is_ok());
        assert!(validate_positive_amount(0.0, "amount").is_err());
        assert!(validate_positive_amount(-5.0, "amount").is_err());
        assert!(validate_positive_amount(f64::NAN, "amount").is_err());
    }

    #[test]
    fn parallel_lists_must_match() {
        assert!(validate_parallel_lists(3, 3, "ingredients_ids", "quantities").is_ok());
        let err = validate_parallel_lists(3, 2, "ingredients_ids", "quantities").unwrap_err();
        assert_eq!(
            err.to_string(),
            "ingredients_ids and quantities must have the same length"
        );
    }
}
