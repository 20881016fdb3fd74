//! # Error Types
//!
//! Domain-specific error types for sama-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sama-core errors (this file)                                          │
//! │  ├── CoreError        - Cart and shop rule violations                  │
//! │  └── ValidationError  - Constructor input failures                     │
//! │                                                                         │
//! │  demo app errors (separate crate)                                      │
//! │  └── DemoError        - Wraps CoreError for the binary                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DemoError → stderr                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, email, etc.)
//! 3. Errors are enum variants, never String
//! 4. Lookups return `Option`, mutations return `CoreResult`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Stock Shortage
// =============================================================================

/// One product whose live stock cannot cover the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortage {
    /// Product name.
    pub product: String,
    /// Quantity the cart asked for.
    pub requested: i64,
    /// Stock available at the time of the check.
    pub available: i64,
}

impl fmt::Display for StockShortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: available {}, requested {}",
            self.product, self.available, self.requested
        )
    }
}

fn describe_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Core Error
// =============================================================================

/// Cart and shop rule violations.
///
/// Every variant is recoverable: the operation that returned it left the
/// cart, the shop and all product stock exactly as they were.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A constructor argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// A quantity that must be positive was zero or negative.
    #[error("Invalid quantity {requested}: must be positive")]
    InvalidQuantity { requested: i64 },

    /// Insufficient stock to cover one or more cart lines.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Mango x2, Pear x10
    ///      │
    ///      ▼
    /// checkout: Mango stock=5 ✓, Pear stock=3 ✗
    ///      │
    ///      ▼
    /// InsufficientStock { shortages: [Pear: available 3, requested 10] }
    ///      │
    ///      ▼
    /// Nothing decremented, cart untouched
    /// ```
    #[error("Insufficient stock for {}", describe_shortages(.shortages))]
    InsufficientStock { shortages: Vec<StockShortage> },

    /// Something with the same identity key is already present.
    ///
    /// ## When This Occurs
    /// - Adding a product that is already in the cart
    /// - Registering a product name twice in a shop
    /// - Registering an email twice in a shop
    #[error("{entity} '{key}' already exists")]
    DuplicateItem { entity: String, key: String },

    /// A mutation referenced something that is not there.
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// Checkout attempted on a cart that is no longer bound to a user.
    #[error("Precondition failed: {reason}")]
    PreconditionFailed { reason: String },

    /// Checkout attempted on a cart with no items.
    #[error("No items in cart")]
    EmptyCart,

    /// A cart amount does not fit in `i64` cents.
    #[error("Amount too large: {context}")]
    AmountOverflow { context: String },

    /// Receipt could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn duplicate(entity: &str, key: &str) -> Self {
        CoreError::DuplicateItem {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found(entity: &str, key: &str) -> Self {
        CoreError::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        CoreError::AmountOverflow {
            context: context.to_string(),
        }
    }

    /// Returns the shortages carried by an `InsufficientStock` error.
    pub fn shortages(&self) -> Option<&[StockShortage]> {
        match self {
            CoreError::InsufficientStock { shortages } => Some(shortages),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by constructors before any entity exists.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
