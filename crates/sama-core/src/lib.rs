//! # sama-core: Pure Domain Logic for SamaShop
//!
//! Products, users, carts and the shop that ties them together, with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SamaShop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/demo                                    │   │
//! │  │    env config ──► tracing subscriber ──► scripted walkthrough  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sama-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   shop    │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   Shop    │  │   │
//! │  │   │   User    │  │ Discount  │  │  Receipt  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Product` (shared stock handle) and `User`
//! - [`money`] - `Money` in integer cents, `Discount` in basis points
//! - [`cart`] - `Cart`, `CartItem`, `CartHandle`
//! - [`receipt`] - structured checkout result
//! - [`shop`] - `Shop`
//! - [`error`] - domain error types
//! - [`validation`] - constructor value checks
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: prices are cents, discounts are basis points
//! 2. **Validate, then commit**: a failed operation changes nothing
//! 3. **Explicit Errors**: all errors are typed, never strings or panics
//! 4. **Identity keys**: products by name, users and carts by email
//!
//! ## Example Usage
//!
//! ```rust
//! use sama_core::{Money, Shop};
//!
//! let mut shop = Shop::new("Sama Shop");
//! let pear = shop.add_product("Pear", Money::from_major_minor(249, 99), 200).unwrap();
//! let user = shop.add_user("test1@example.com", "123").unwrap();
//!
//! let cart = shop.create_cart(&user);
//! cart.with_cart_mut(|c| c.add_item(&pear, 2)).unwrap();
//!
//! let receipt = shop.checkout(&cart).unwrap();
//! assert_eq!(receipt.total.to_string(), "499.98");
//! assert_eq!(pear.quantity(), 198);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod shop;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartHandle, CartItem};
pub use error::{CoreError, CoreResult, StockShortage, ValidationError};
pub use money::{Discount, Money};
pub use receipt::{Receipt, ReceiptLine};
pub use shop::Shop;
pub use types::{Product, User};
