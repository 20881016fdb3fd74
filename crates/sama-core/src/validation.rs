//! # Validation Module
//!
//! Value checks run by the `Product` and `User` constructors.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Type system                                                  │
//! │  └── Only a Product can be put in a cart, only a User can own one      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (constructors)                                   │
//! │  └── Non-empty keys, non-negative price/stock, discount in [0, 1]      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / Shop rules                                            │
//! │  └── Positive quantities, stock coverage, uniqueness                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sama_core::validation::{validate_product_name, validate_stock};
//!
//! assert!(validate_product_name("Mango").is_ok());
//! assert!(validate_stock(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Discount, Money};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest accepted email (RFC 5321).
pub const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a user email.
///
/// Only presence and length are checked; the email is an identity key,
/// not a deliverable address.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial stock level.
pub fn validate_stock(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount: between 0% and 100%.
pub fn validate_discount(discount: Discount) -> ValidationResult<()> {
    if discount.bps() > Discount::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::from(Discount::MAX_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Mango").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("Maurice").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email(&"a".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(9999)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(200).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount(Discount::none()).is_ok());
        assert!(validate_discount(Discount::from_bps(10_000)).is_ok());
        assert!(validate_discount(Discount::from_bps(10_001)).is_err());
    }
}
