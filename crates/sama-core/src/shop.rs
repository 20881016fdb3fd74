//! # Shop
//!
//! Owns the catalogue, the registered users and the open carts, and enforces
//! uniqueness across them.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Shop                                          │
//! │                                                                         │
//! │  products: name  → Product     (one per name)                          │
//! │  users:    email → User        (one per email)                         │
//! │  carts:    email → CartHandle  (one per user)                          │
//! │                                                                         │
//! │  create_cart(u) ──► existing handle for u, or a new one                │
//! │                                                                         │
//! │  checkout(h) ─────► user? ── no ──► PreconditionFailed                 │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                     items? ── no ──► EmptyCart                          │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                     Cart::checkout ── err ──► propagated, cart kept    │
//! │                       │                                                 │
//! │                       ▼                                                 │
//! │                     carts.remove(email), receipt returned              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collections are keyed by identity so duplicate checks and lookups are map
//! operations. `BTreeMap` keeps listings in a stable order.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::cart::{Cart, CartHandle};
use crate::error::{CoreError, CoreResult};
use crate::money::{Discount, Money};
use crate::receipt::Receipt;
use crate::types::{Product, User};

/// A shop: catalogue, customers and their carts.
///
/// ## Example
/// ```rust
/// use sama_core::{Money, Shop};
///
/// let mut shop = Shop::new("S");
/// let mango = shop.add_product("Mango", Money::from_major_minor(99, 99), 10).unwrap();
/// let user = shop.add_user("a@x.com", "pw").unwrap();
///
/// let cart = shop.create_cart(&user);
/// cart.with_cart_mut(|c| c.add_item(&mango, 3)).unwrap();
/// assert_eq!(cart.with_cart(|c| c.total()).unwrap().to_string(), "299.97");
///
/// shop.checkout(&cart).unwrap();
/// assert_eq!(mango.quantity(), 7);
/// assert!(shop.get_cart(&user).is_none());
/// ```
#[derive(Debug)]
pub struct Shop {
    name: String,
    products: BTreeMap<String, Product>,
    users: BTreeMap<String, User>,
    carts: BTreeMap<String, CartHandle>,
}

impl Shop {
    pub fn new(name: impl Into<String>) -> Self {
        Shop {
            name: name.into(),
            products: BTreeMap::new(),
            users: BTreeMap::new(),
            carts: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Registers a product with no discount.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> CoreResult<Product> {
        self.add_product_with_discount(name, price, quantity, Discount::none())
    }

    /// Registers a product.
    ///
    /// ## Errors
    /// - `InvalidArgument` if the product values are invalid
    /// - `DuplicateItem` if a product with this name exists
    pub fn add_product_with_discount(
        &mut self,
        name: impl Into<String>,
        price: Money,
        quantity: i64,
        discount: Discount,
    ) -> CoreResult<Product> {
        let product = Product::with_discount(name, price, quantity, discount)?;
        if self.products.contains_key(product.name()) {
            return Err(CoreError::duplicate("Product", product.name()));
        }

        info!(product = %product.name(), price = %price, quantity, "product added");
        self.products.insert(product.name().to_string(), product.clone());
        Ok(product)
    }

    pub fn get_product(&self, name: &str) -> Option<Product> {
        self.products.get(name).cloned()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Registers a user.
    ///
    /// ## Errors
    /// - `InvalidArgument` if the email is empty
    /// - `DuplicateItem` if the email is already registered
    pub fn add_user(
        &mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> CoreResult<User> {
        let user = User::new(email, password)?;
        if self.users.contains_key(user.email()) {
            return Err(CoreError::duplicate("User", user.email()));
        }

        info!(email = %user.email(), "user added");
        self.users.insert(user.email().to_string(), user.clone());
        Ok(user)
    }

    pub fn get_user(&self, email: &str) -> Option<User> {
        self.users.get(email).cloned()
    }

    /// Returns the user when both email and password match.
    pub fn login(&self, email: &str, password: &str) -> Option<User> {
        let user = self
            .users
            .get(email)
            .filter(|u| u.check_password(password))
            .cloned();
        debug!(email, success = user.is_some(), "login");
        user
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    // =========================================================================
    // Carts
    // =========================================================================

    /// Returns the user's open cart, creating it if there is none.
    ///
    /// Calling this twice for the same user returns the same cart and does
    /// not grow the cart collection.
    pub fn create_cart(&mut self, user: &User) -> CartHandle {
        self.carts
            .entry(user.email().to_string())
            .or_insert_with(|| {
                info!(email = %user.email(), "cart created");
                CartHandle::new(Cart::new(user.clone()))
            })
            .clone()
    }

    pub fn get_cart(&self, user: &User) -> Option<CartHandle> {
        self.carts.get(user.email()).cloned()
    }

    pub fn carts(&self) -> impl Iterator<Item = &CartHandle> {
        self.carts.values()
    }

    pub fn cart_count(&self) -> usize {
        self.carts.len()
    }

    /// Checks a cart out and closes it.
    ///
    /// ## Errors
    /// - `PreconditionFailed` if the cart has no user
    /// - `EmptyCart` if the cart has no items
    /// - `InsufficientStock` from [`Cart::checkout`]; the cart stays open
    pub fn checkout(&mut self, cart: &CartHandle) -> CoreResult<Receipt> {
        let receipt = cart.with_cart_mut(|c| -> CoreResult<(String, Receipt)> {
            let email = c
                .user()
                .map(|u| u.email().to_string())
                .ok_or_else(|| CoreError::PreconditionFailed {
                    reason: "Cart not attributed to a user".to_string(),
                })?;

            if c.is_empty() {
                return Err(CoreError::EmptyCart);
            }

            c.checkout().map(|receipt| (email, receipt))
        });

        let (email, receipt) = receipt?;
        self.carts.remove(&email);
        debug!(email = %email, open_carts = self.carts.len(), "cart closed");
        Ok(receipt)
    }
}

impl fmt::Display for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n\nProducts", self.name)?;
        writeln!(f, "Name\t\tPrice\t\tQuantity\tDiscount")?;
        for product in self.products.values() {
            writeln!(
                f,
                "{}\t\t{}\t\t{}\t\t{}",
                product.name(),
                product.price(),
                product.quantity(),
                product.discount()
            )?;
        }

        writeln!(f, "\nUsers")?;
        for user in self.users.values() {
            writeln!(f, "{}", user)?;
        }

        writeln!(f, "\nCarts")?;
        for cart in self.carts.values() {
            writeln!(f, "{}", cart)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Shop with Banana (200.00 × 10), user@example.com and their cart.
    fn fixture() -> (Shop, Product, User, CartHandle) {
        let mut shop = Shop::new("Sama Shop");
        let banana = shop.add_product("Banana", Money::from_cents(20000), 10).unwrap();
        let user = shop.add_user("user@example.com", "123").unwrap();
        let cart = shop.create_cart(&user);
        (shop, banana, user, cart)
    }

    #[test]
    fn test_add_product_rejects_duplicate_name() {
        let (mut shop, _, _, _) = fixture();

        let err = shop
            .add_product("Banana", Money::from_cents(10000), 10)
            .unwrap_err();

        assert!(matches!(err, CoreError::DuplicateItem { .. }));
        assert_eq!(shop.product_count(), 1);
        assert_eq!(shop.get_product("Banana").unwrap().price().cents(), 20000);
    }

    #[test]
    fn test_add_product_returns_product() {
        let (mut shop, _, _, _) = fixture();

        let pear = shop.add_product("Pear", Money::from_cents(15000), 10).unwrap();

        assert_eq!(pear.name(), "Pear");
        assert_eq!(shop.get_product("Pear"), Some(pear));
        assert!(matches!(
            shop.add_product("Pear", Money::from_cents(1), 1),
            Err(CoreError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn test_add_product_rejects_invalid_values() {
        let (mut shop, _, _, _) = fixture();

        assert!(matches!(
            shop.add_product_with_discount(
                "Kiwi",
                Money::from_cents(100),
                1,
                Discount::from_bps(20_000),
            ),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(shop.get_product("Kiwi").is_none());
    }

    #[test]
    fn test_get_product() {
        let (shop, banana, _, _) = fixture();
        assert_eq!(shop.get_product("Banana"), Some(banana));
        assert!(shop.get_product("Pear").is_none());
    }

    #[test]
    fn test_add_user_rejects_duplicate_email() {
        let (mut shop, _, _, _) = fixture();

        let err = shop.add_user("user@example.com", "456").unwrap_err();

        assert!(matches!(err, CoreError::DuplicateItem { .. }));
        assert_eq!(shop.user_count(), 1);
        assert!(shop.login("user@example.com", "123").is_some());
    }

    #[test]
    fn test_add_and_get_user() {
        let (mut shop, _, user, _) = fixture();

        let other = shop.add_user("test@example.com", "123").unwrap();

        assert_eq!(other.email(), "test@example.com");
        assert_eq!(shop.get_user("user@example.com"), Some(user));
        assert!(shop.get_user("missing@example.com").is_none());
    }

    #[test]
    fn test_login() {
        let (shop, _, user, _) = fixture();

        assert_eq!(shop.login("user@example.com", "123"), Some(user));
        assert!(shop.login("user@example.com", "wrong").is_none());
        assert!(shop.login("nobody@example.com", "123").is_none());
    }

    #[test]
    fn test_create_cart_is_idempotent_per_user() {
        let (mut shop, banana, user, cart) = fixture();
        cart.with_cart_mut(|c| c.add_item(&banana, 1)).unwrap();

        let again = shop.create_cart(&user);

        assert_eq!(shop.cart_count(), 1);
        assert_eq!(again, cart);
        assert_eq!(again.with_cart(|c| c.quantity_of(&banana)), Some(1));
    }

    #[test]
    fn test_create_cart_for_new_user() {
        let (mut shop, _, _, _) = fixture();
        let user = shop.add_user("test@example.com", "123").unwrap();

        let cart = shop.create_cart(&user);

        assert_eq!(cart.user(), Some(user));
        assert_eq!(shop.cart_count(), 2);
    }

    #[test]
    fn test_get_cart() {
        let (mut shop, _, user, cart) = fixture();
        let other = shop.add_user("test@example.com", "123").unwrap();

        assert_eq!(shop.get_cart(&user), Some(cart));
        assert!(shop.get_cart(&other).is_none());
    }

    #[test]
    fn test_checkout_requires_user() {
        let (mut shop, banana, _, cart) = fixture();
        cart.with_cart_mut(|c| {
            c.add_item(&banana, 1).unwrap();
            c.clear();
        });

        assert!(matches!(
            shop.checkout(&cart),
            Err(CoreError::PreconditionFailed { .. })
        ));
    }

    #[test]
    fn test_checkout_requires_items() {
        let (mut shop, _, user, cart) = fixture();

        assert!(matches!(shop.checkout(&cart), Err(CoreError::EmptyCart)));
        assert!(shop.get_cart(&user).is_some());
    }

    #[test]
    fn test_checkout_keeps_cart_open_on_insufficient_stock() {
        let (mut shop, banana, user, cart) = fixture();
        cart.with_cart_mut(|c| c.add_item(&banana, 8)).unwrap();

        let rival = shop.add_user("rival@example.com", "x").unwrap();
        let rival_cart = shop.create_cart(&rival);
        rival_cart.with_cart_mut(|c| c.add_item(&banana, 5)).unwrap();
        shop.checkout(&rival_cart).unwrap();

        let err = shop.checkout(&cart).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(banana.quantity(), 5);
        assert_eq!(shop.get_cart(&user), Some(cart.clone()));
        assert_eq!(cart.with_cart(|c| c.quantity_of(&banana)), Some(8));
    }

    #[test]
    fn test_checkout_keeps_cart_open_on_amount_overflow() {
        let (mut shop, _, user, cart) = fixture();
        let gold = shop
            .add_product("Gold", Money::from_cents(i64::MAX / 2), 3)
            .unwrap();
        cart.with_cart_mut(|c| c.add_item(&gold, 3)).unwrap();

        let err = shop.checkout(&cart).unwrap_err();

        assert!(matches!(err, CoreError::AmountOverflow { .. }));
        assert_eq!(gold.quantity(), 3);
        assert_eq!(shop.get_cart(&user), Some(cart));
    }

    #[test]
    fn test_checkout_scenario() {
        let mut shop = Shop::new("S");
        let mango = shop
            .add_product("Mango", Money::from_major_minor(99, 99), 10)
            .unwrap();
        let user = shop.add_user("a@x.com", "pw").unwrap();
        let cart = shop.create_cart(&user);
        cart.with_cart_mut(|c| c.add_item(&mango, 3)).unwrap();
        assert_eq!(cart.with_cart(|c| c.total()).unwrap(), Money::from_cents(29997));

        let receipt = shop.checkout(&cart).unwrap();

        assert_eq!(mango.quantity(), 7);
        assert_eq!(shop.get_product("Mango").unwrap().quantity(), 7);
        assert_eq!(shop.cart_count(), 0);
        assert!(shop.get_cart(&user).is_none());
        assert!(cart.user().is_none());
        assert_eq!(receipt.total.to_string(), "299.97");
    }

    #[test]
    fn test_new_cart_after_checkout() {
        let (mut shop, banana, user, cart) = fixture();
        cart.with_cart_mut(|c| c.add_item(&banana, 2)).unwrap();
        shop.checkout(&cart).unwrap();

        let fresh = shop.create_cart(&user);

        assert_eq!(shop.cart_count(), 1);
        assert!(fresh.with_cart(Cart::is_empty));
        assert_eq!(fresh.user(), Some(user));
    }

    #[test]
    fn test_display_lists_everything() {
        let (shop, banana, _, cart) = fixture();
        cart.with_cart_mut(|c| c.add_item(&banana, 2)).unwrap();

        let text = shop.to_string();

        assert!(text.starts_with("Sama Shop\n\nProducts\n"));
        assert!(text.contains("Banana\t\t200.00\t\t10\t\t0.00"));
        assert!(text.contains("\nUsers\nuser@example.com\n"));
        assert!(text.contains("user@example.com's cart"));
        assert!(text.contains("1\t\tBanana\t\t2\t\t200.00\t\t0.00\t\t400.00"));
    }
}
