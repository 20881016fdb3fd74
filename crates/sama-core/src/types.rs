//! # Domain Types
//!
//! The records a shop is built from: `Product` and `User`.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐              ┌─────────────────────┐          │
//! │  │      Product        │              │        User         │          │
//! │  │  ─────────────────  │              │  ─────────────────  │          │
//! │  │  name  (identity)   │              │  email (identity)   │          │
//! │  │  price (Money)      │              │  password (plain)   │          │
//! │  │  discount (bps)     │              └─────────────────────┘          │
//! │  │  stock  (shared) ◄──┼── every clone sees the same counter            │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Equality and hashing use only the identity key (product name, user
//! email). The mutable stock counter never takes part in either.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::error::CoreResult;
use crate::money::{Discount, Money};
use crate::validation::{
    validate_discount, validate_email, validate_price, validate_product_name, validate_stock,
};

// =============================================================================
// Product
// =============================================================================

#[derive(Debug)]
struct ProductRecord {
    name: String,
    price: Money,
    discount: Discount,
    stock: AtomicI64,
}

/// A product available for sale.
///
/// `Product` is a handle: cloning it is cheap and every clone reads and
/// writes the same live stock counter. The shop keeps one clone, each cart
/// line keeps another, and a checkout through any cart is visible to all.
///
/// ## Example
/// ```rust
/// use sama_core::{Money, Product};
///
/// let mango = Product::new("Mango", Money::from_major_minor(99, 99), 10).unwrap();
/// let same = mango.clone();
/// assert_eq!(same.quantity(), 10);
/// assert_eq!(mango, same);
/// ```
#[derive(Debug, Clone)]
pub struct Product {
    inner: Arc<ProductRecord>,
}

impl Product {
    /// Creates a product with no discount.
    pub fn new(name: impl Into<String>, price: Money, quantity: i64) -> CoreResult<Self> {
        Self::with_discount(name, price, quantity, Discount::none())
    }

    /// Creates a product with a discount.
    ///
    /// ## Errors
    /// `InvalidArgument` when the name is empty, the price or quantity is
    /// negative, or the discount is above 100%.
    pub fn with_discount(
        name: impl Into<String>,
        price: Money,
        quantity: i64,
        discount: Discount,
    ) -> CoreResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_price(price)?;
        validate_stock(quantity)?;
        validate_discount(discount)?;

        Ok(Product {
            inner: Arc::new(ProductRecord {
                name,
                price,
                discount,
                stock: AtomicI64::new(quantity),
            }),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.inner.price
    }

    #[inline]
    pub fn discount(&self) -> Discount {
        self.inner.discount
    }

    /// Current live stock.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.inner.stock.load(Ordering::SeqCst)
    }

    /// Checks if the live stock covers `quantity`.
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.quantity()
    }

    /// Removes sold units from stock. Callers check coverage first.
    pub(crate) fn withdraw(&self, quantity: i64) {
        self.inner.stock.fetch_sub(quantity, Ordering::SeqCst);
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.inner.name == other.inner.name
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name:{}\t\tPrice:{}\t\tQuantity:{}\t\tDiscount:{}",
            self.name(),
            self.price(),
            self.quantity(),
            self.discount()
        )
    }
}

// =============================================================================
// User
// =============================================================================

/// A shop customer, identified by email.
///
/// The password is kept and compared as plain text.
#[derive(Debug, Clone)]
pub struct User {
    email: String,
    password: String,
}

impl User {
    /// Creates a user.
    ///
    /// ## Errors
    /// `InvalidArgument` when the email is empty.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> CoreResult<Self> {
        let email = email.into();
        validate_email(&email)?;

        Ok(User {
            email,
            password: password.into(),
        })
    }

    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Plain comparison against the stored password.
    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::collections::HashSet;

    #[test]
    fn test_product_equality_by_name() {
        let a = Product::new("Pear", Money::from_cents(35000), 50).unwrap();
        let b = Product::new("Pear", Money::from_cents(100), 1).unwrap();
        let c = Product::new("Apple", Money::from_cents(35000), 50).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Product> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_product_clones_share_stock() {
        let mango = Product::new("Mango", Money::from_cents(9999), 10).unwrap();
        let on_shelf = mango.clone();

        mango.withdraw(3);

        assert_eq!(on_shelf.quantity(), 7);
        assert!(on_shelf.can_supply(7));
        assert!(!on_shelf.can_supply(8));
    }

    #[test]
    fn test_product_rejects_invalid_values() {
        let price = Money::from_cents(100);
        assert!(matches!(
            Product::new("", price, 1),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(Product::new("Mango", Money::from_cents(-1), 1).is_err());
        assert!(Product::new("Mango", price, -1).is_err());
        assert!(Product::with_discount("Mango", price, 1, Discount::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_product_display() {
        let apple =
            Product::with_discount("Apple", Money::from_cents(30050), 30, Discount::from_bps(1000))
                .unwrap();
        assert_eq!(
            apple.to_string(),
            "Name:Apple\t\tPrice:300.50\t\tQuantity:30\t\tDiscount:0.10"
        );
    }

    #[test]
    fn test_user_equality_by_email() {
        let a = User::new("a@x.com", "pw").unwrap();
        let b = User::new("a@x.com", "other").unwrap();
        let c = User::new("b@x.com", "pw").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "a@x.com");
    }

    #[test]
    fn test_user_password_check() {
        let user = User::new("a@x.com", "123").unwrap();
        assert!(user.check_password("123"));
        assert!(!user.check_password("1234"));
        assert!(User::new("", "123").is_err());
    }
}
