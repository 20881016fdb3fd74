//! # Demo Error Types
//!
//! The error the demo binary reports when a walkthrough step fails.
//!
//! ## Error Flow
//! ```text
//! ValidationError ──► CoreError ──► DemoError ──► stderr (+ JSON with code)
//! ```

use sama_core::CoreError;
use serde::Serialize;

/// Error returned by the demo walkthrough.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Mango: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, one per kind of failure a caller would handle differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad constructor input or quantity
    ValidationError,

    /// Something is already registered or already in the cart
    Duplicate,

    /// Referenced item is absent
    NotFound,

    /// Stock cannot cover the request
    InsufficientStock,

    /// Checkout preconditions not met
    CartError,

    /// Anything else
    Internal,
}

impl DemoError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        DemoError {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DemoError::new(ErrorCode::Internal, message)
    }

    /// JSON form, falling back to the plain message.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

impl From<CoreError> for DemoError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidArgument(_) | CoreError::InvalidQuantity { .. } => {
                ErrorCode::ValidationError
            }
            CoreError::DuplicateItem { .. } => ErrorCode::Duplicate,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::PreconditionFailed { .. } | CoreError::EmptyCart => ErrorCode::CartError,
            CoreError::AmountOverflow { .. } | CoreError::Serialization(_) => {
                ErrorCode::Internal
            }
        };
        DemoError::new(code, err.to_string())
    }
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for DemoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        assert_eq!(DemoError::from(CoreError::EmptyCart).code, ErrorCode::CartError);
        assert_eq!(
            DemoError::from(CoreError::InvalidQuantity { requested: 0 }).code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            DemoError::from(CoreError::InsufficientStock { shortages: vec![] }).code,
            ErrorCode::InsufficientStock
        );
        assert_eq!(
            DemoError::from(CoreError::AmountOverflow {
                context: "cart total".to_string(),
            })
            .code,
            ErrorCode::Internal
        );
    }

    #[test]
    fn test_json_shape() {
        let err = DemoError::from(CoreError::EmptyCart);
        assert_eq!(
            err.to_json(),
            r#"{"code":"CART_ERROR","message":"No items in cart"}"#
        );
        assert_eq!(err.to_string(), "[CartError] No items in cart");
    }
}
