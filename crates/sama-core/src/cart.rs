//! # Cart
//!
//! A user's shopping cart: which products, how many of each, and checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(p, n) ─────────► items.push((p, n))   p not present, n ≤ stock│
//! │                                                                         │
//! │  change_quantity(p, n) ──► items[p] = n         n ≤ 0 removes the line  │
//! │                                                                         │
//! │  remove_item(p) ─────────► items.remove(p)      returns Option<Product> │
//! │                                                                         │
//! │  checkout() ─────────────► 1. collect every shortage (no mutation)      │
//! │                            2. any shortage? → InsufficientStock         │
//! │                            3. price the lines (AmountOverflow)          │
//! │                            4. withdraw stock, build receipt, clear      │
//! │                                                                         │
//! │  clear() ────────────────► user = None, items emptied                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A product appears at most once
//! - Every stored quantity is > 0
//! - Items keep insertion order

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult, StockShortage};
use crate::money::Money;
use crate::receipt::{write_line_table, Receipt, ReceiptLine};
use crate::types::{Product, User};

// =============================================================================
// Cart Item
// =============================================================================

/// A product in the cart and how many of it the user wants.
///
/// Unlike a receipt line, the product is live: its stock is whatever the
/// shop currently has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// `quantity × price × (1 − discount)`, rounded to cents.
    ///
    /// ## Errors
    /// - `AmountOverflow` if the line does not fit in `i64` cents
    pub fn line_total(&self) -> CoreResult<Money> {
        self.product
            .price()
            .discounted_total(self.quantity, self.product.discount())
            .ok_or_else(|| CoreError::overflow(self.product.name()))
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Two carts are equal when they belong to the same user, which is what lets
/// a shop keep at most one cart per user.
///
/// ## Example
/// ```rust
/// use sama_core::{Cart, Money, Product, User};
///
/// let mango = Product::new("Mango", Money::from_major_minor(99, 99), 10).unwrap();
/// let mut cart = Cart::new(User::new("a@x.com", "pw").unwrap());
///
/// cart.add_item(&mango, 3).unwrap();
/// assert_eq!(cart.total().unwrap().to_string(), "299.97");
///
/// let receipt = cart.checkout().unwrap();
/// assert_eq!(receipt.total.cents(), 29997);
/// assert_eq!(mango.quantity(), 7);
/// assert!(cart.user().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Cart {
    user: Option<User>,
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart owned by `user`.
    pub fn new(user: User) -> Self {
        Cart {
            user: Some(user),
            items: Vec::new(),
        }
    }

    /// The owner, or `None` once the cart has been checked out or cleared.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    fn position(&self, product: &Product) -> Option<usize> {
        self.items.iter().position(|i| i.product == *product)
    }

    pub fn contains(&self, product: &Product) -> bool {
        self.position(product).is_some()
    }

    /// Requested quantity for `product`, if it is in the cart.
    pub fn quantity_of(&self, product: &Product) -> Option<i64> {
        self.items
            .iter()
            .find(|i| i.product == *product)
            .map(|i| i.quantity)
    }

    /// Adds a product that is not yet in the cart.
    ///
    /// ## Errors
    /// - `DuplicateItem` if the product is already in the cart; use
    ///   [`Cart::change_quantity`] instead
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `InsufficientStock` if `quantity` exceeds the live stock
    ///
    /// The product's stock is not touched.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if self.contains(product) {
            return Err(CoreError::duplicate("Cart item", product.name()));
        }

        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        ensure_stock(product, quantity)?;

        debug!(product = %product.name(), quantity, "add_item");
        self.items.push(CartItem {
            product: product.clone(),
            quantity,
        });
        Ok(())
    }

    /// Adds each product once, in order.
    ///
    /// Stops at the first failure. Products added before it stay in the cart.
    pub fn add_items<'a, I>(&mut self, products: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        for product in products {
            self.add_item(product, 1)?;
        }
        Ok(())
    }

    /// Removes a product. Returns it, or `None` if it was not in the cart.
    pub fn remove_item(&mut self, product: &Product) -> Option<Product> {
        let index = self.position(product)?;
        debug!(product = %product.name(), "remove_item");
        Some(self.items.remove(index).product)
    }

    /// Sets the quantity of a product already in the cart.
    ///
    /// A quantity of zero or less removes the line.
    ///
    /// ## Errors
    /// - `NotFound` if the product is not in the cart
    /// - `InsufficientStock` if `quantity` exceeds the live stock
    pub fn change_quantity(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        let index = self
            .position(product)
            .ok_or_else(|| CoreError::not_found("Cart item", product.name()))?;

        if quantity <= 0 {
            debug!(product = %product.name(), "change_quantity removed line");
            self.items.remove(index);
            return Ok(());
        }

        ensure_stock(product, quantity)?;

        debug!(product = %product.name(), quantity, "change_quantity");
        self.items[index].quantity = quantity;
        Ok(())
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// `Σ quantity × price × (1 − discount)`, rounded once to cents.
    ///
    /// ## Errors
    /// - `AmountOverflow` if a line or the sum does not fit in `i64` cents
    pub fn total(&self) -> CoreResult<Money> {
        Money::sum_discounted(
            self.items
                .iter()
                .map(|i| (i.product.price(), i.quantity, i.product.discount())),
        )
        .ok_or_else(|| CoreError::overflow("cart total"))
    }

    /// Numbered rows for display and receipts.
    pub fn lines(&self) -> CoreResult<Vec<ReceiptLine>> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                Ok(ReceiptLine {
                    number: idx + 1,
                    name: item.product.name().to_string(),
                    quantity: item.quantity,
                    unit_price: item.product.price(),
                    discount: item.product.discount(),
                    line_total: item.line_total()?,
                })
            })
            .collect()
    }

    /// Buys everything in the cart.
    ///
    /// Every line is checked against the product's *current* stock before
    /// anything changes. If any line is short the cart and all stock stay as
    /// they were and the error lists every short line. Otherwise stock is
    /// withdrawn, a receipt of the contents is returned and the cart is
    /// cleared. A cart whose amounts overflow fails with `AmountOverflow`,
    /// also before any stock moves.
    pub fn checkout(&mut self) -> CoreResult<Receipt> {
        let shortages: Vec<StockShortage> = self
            .items
            .iter()
            .filter(|i| !i.product.can_supply(i.quantity))
            .map(|i| StockShortage {
                product: i.product.name().to_string(),
                requested: i.quantity,
                available: i.product.quantity(),
            })
            .collect();

        if !shortages.is_empty() {
            warn!(
                user = ?self.user.as_ref().map(User::email),
                short_lines = shortages.len(),
                "checkout rejected"
            );
            return Err(CoreError::InsufficientStock { shortages });
        }

        let receipt = Receipt::new(
            self.user.as_ref().map(|u| u.email().to_string()),
            self.lines()?,
            self.total()?,
        );

        for item in &self.items {
            item.product.withdraw(item.quantity);
        }

        info!(
            receipt_id = %receipt.id,
            lines = receipt.lines.len(),
            total = %receipt.total,
            "checkout completed"
        );
        self.clear();
        Ok(receipt)
    }

    /// Detaches the user and drops every line.
    pub fn clear(&mut self) {
        self.user = None;
        self.items.clear();
    }
}

fn ensure_stock(product: &Product, quantity: i64) -> CoreResult<()> {
    if product.can_supply(quantity) {
        return Ok(());
    }
    Err(CoreError::InsufficientStock {
        shortages: vec![StockShortage {
            product: product.name().to_string(),
            requested: quantity,
            available: product.quantity(),
        }],
    })
}

impl PartialEq for Cart {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
    }
}

impl fmt::Display for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(user) = &self.user else {
            return f.write_str("Empty cart");
        };
        writeln!(f, "{}'s cart\n", user)?;
        match (self.lines(), self.total()) {
            (Ok(lines), Ok(total)) => write_line_table(f, &lines, total),
            (Err(err), _) | (_, Err(err)) => write!(f, "{}", err),
        }
    }
}

// =============================================================================
// Cart Handle
// =============================================================================

/// A cart shared between a shop and its caller.
///
/// The shop keeps one handle per user; the caller gets a clone and mutates
/// the same cart through it.
///
/// ## Poisoning
/// Every cart mutation validates before it changes anything, so a cart left
/// behind by a panicking holder is still consistent and the lock is
/// recovered rather than propagated.
#[derive(Debug, Clone)]
pub struct CartHandle {
    cart: Arc<Mutex<Cart>>,
}

impl CartHandle {
    pub fn new(cart: Cart) -> Self {
        CartHandle {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = handle.with_cart(|cart| cart.total())?;
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// handle.with_cart_mut(|cart| cart.add_item(&mango, 3))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Owner of the cart, cloned out of the lock.
    pub fn user(&self) -> Option<User> {
        self.with_cart(|c| c.user().cloned())
    }
}

impl PartialEq for CartHandle {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.cart, &other.cart) {
            return true;
        }
        let user = self.user();
        other.with_cart(|c| c.user() == user.as_ref())
    }
}

impl fmt::Display for CartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_cart(|c| fmt::Display::fmt(c, f))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
