//! # Validation
//!
//! Boundary validation of user input, in the spirit of defense in
//! depth: the UI gives immediate feedback, this module enforces the
//! business rules, and the backend re-validates authoritatively.
//! Negative or non-finite values are rejected here, never silently
//! coerced inside the pricing calculator.

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a sale or order line quantity: 1..=MAX_LINE_QUANTITY.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit cost for a purchase order item. Zero is allowed
/// (free goods, samples); negative is not.
pub fn validate_unit_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_cost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a unit sale price. Same rule as unit cost.
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a discount percentage before conversion to basis points.
///
/// Clamping to [0, 100] happens in `Percent::from_percent`; this check
/// exists so a typed-in "NaN" or "1e308" is reported as an error at
/// the form boundary instead of being clamped silently to zero.
pub fn validate_discount_percent(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "discount_percent".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates and normalizes a catalog/customer search query.
///
/// Returns `None` for queries that must not produce a request (empty
/// or under 2 characters after trimming), per the search contract.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    if query.chars().count() < 2 {
        return Ok(None);
    }

    Ok(Some(query.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn unit_cost_allows_zero() {
        assert!(validate_unit_cost_cents(0).is_ok());
        assert!(validate_unit_cost_cents(1_099).is_ok());
        assert!(validate_unit_cost_cents(-1).is_err());
    }

    #[test]
    fn discount_percent_rules() {
        assert!(validate_discount_percent(0.0).is_ok());
        assert!(validate_discount_percent(100.0).is_ok());
        assert!(validate_discount_percent(12.5).is_ok());

        assert!(validate_discount_percent(-1.0).is_err());
        assert!(validate_discount_percent(101.0).is_err());
        assert!(validate_discount_percent(f64::NAN).is_err());
        assert!(validate_discount_percent(f64::INFINITY).is_err());
    }

    #[test]
    fn short_queries_yield_no_request() {
        assert_eq!(validate_search_query("").unwrap(), None);
        assert_eq!(validate_search_query(" a ").unwrap(), None);
        assert_eq!(
            validate_search_query("  ibuprofen ").unwrap(),
            Some("ibuprofen".to_string())
        );
    }

    #[test]
    fn overlong_query_rejected() {
        assert!(validate_search_query(&"x".repeat(150)).is_err());
    }
}
