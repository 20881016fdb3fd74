//! # SamaShop Demo Library
//!
//! Seeds a shop and walks through the cart lifecycle, logging as it goes.
//!
//! ## Module Organization
//! ```text
//! sama_demo_lib/
//! ├── lib.rs      ◄─── You are here (logging setup & walkthrough)
//! ├── config.rs   ◄─── DemoConfig from SAMA_* variables
//! └── error.rs    ◄─── DemoError with machine-readable codes
//! ```

pub mod config;
pub mod error;

use sama_core::{CartHandle, CoreError, Money, Receipt, Shop};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;
use error::DemoError;

/// Seed catalogue: name, price in cents, stock.
const SEED_PRODUCTS: &[(&str, i64, i64)] = &[
    ("Pear", 24999, 200),
    ("Mango", 9999, 50),
    ("Apple", 24950, 150),
    ("Cherry", 4999, 200),
    ("Pawpaw", 14999, 100),
];

const SEED_USERS: &[(&str, &str)] = &[
    ("test1@example.com", "123"),
    ("test2@example.com", "123"),
    ("test3@example.com", "123"),
];

/// Runs the demo.
///
/// ## Walkthrough
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (RUST_LOG or SAMA_LOG_LEVEL)                     │
/// │  2. Seed products and users                                            │
/// │  3. test2 fills a cart with cherries and ten mangoes                   │
/// │  4. test1 fills a cart, adjusts it, checks out 45 of the 50 mangoes    │
/// │  5. test2 checks out: refused, nothing withdrawn, cart stays open      │
/// │  6. Print the shop                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(config: &DemoConfig) -> Result<(), DemoError> {
    init_tracing(&config.log_level);
    info!(shop = %config.shop_name, "Starting SamaShop demo");

    let mut shop = seed_shop(&config.shop_name)?;
    info!(
        products = shop.product_count(),
        users = shop.user_count(),
        "Shop seeded"
    );

    let waiting = fill_second_cart(&mut shop)?;

    let receipt = first_customer(&mut shop)?;
    print_receipt(config, &receipt)?;

    match shop.checkout(&waiting) {
        Ok(receipt) => print_receipt(config, &receipt)?,
        Err(err @ CoreError::InsufficientStock { .. }) => {
            let err = DemoError::from(err);
            warn!(error = %err, "second checkout refused");
            println!("{}\n", err.to_json());
        }
        Err(err) => return Err(err.into()),
    }

    println!("{}", shop);
    Ok(())
}

/// Builds the seed shop.
pub fn seed_shop(name: &str) -> Result<Shop, CoreError> {
    let mut shop = Shop::new(name);
    for &(product, cents, stock) in SEED_PRODUCTS {
        shop.add_product(product, Money::from_cents(cents), stock)?;
    }
    for &(email, password) in SEED_USERS {
        shop.add_user(email, password)?;
    }
    Ok(shop)
}

fn require<T>(value: Option<T>, entity: &str, key: &str) -> Result<T, DemoError> {
    value.ok_or_else(|| {
        DemoError::new(
            error::ErrorCode::NotFound,
            format!("{} not found: {}", entity, key),
        )
    })
}

/// test1: pear, apple, five mango; then 45 mango, drop the apple, check out.
fn first_customer(shop: &mut Shop) -> Result<Receipt, DemoError> {
    let user = require(shop.login("test1@example.com", "123"), "User", "test1@example.com")?;
    let pear = require(shop.get_product("Pear"), "Product", "Pear")?;
    let apple = require(shop.get_product("Apple"), "Product", "Apple")?;
    let mango = require(shop.get_product("Mango"), "Product", "Mango")?;

    let cart = shop.create_cart(&user);
    cart.with_cart_mut(|c| -> Result<(), CoreError> {
        c.add_items([&pear, &apple])?;
        c.add_item(&mango, 5)?;
        c.change_quantity(&mango, 45)?;
        c.remove_item(&apple);
        Ok(())
    })?;
    println!("{}", cart);

    Ok(shop.checkout(&cart)?)
}

/// test2: two cherries and ten mangoes, left open.
fn fill_second_cart(shop: &mut Shop) -> Result<CartHandle, DemoError> {
    let user = require(shop.get_user("test2@example.com"), "User", "test2@example.com")?;
    let cherry = require(shop.get_product("Cherry"), "Product", "Cherry")?;
    let mango = require(shop.get_product("Mango"), "Product", "Mango")?;

    let cart = shop.create_cart(&user);
    cart.with_cart_mut(|c| -> Result<(), CoreError> {
        c.add_item(&cherry, 2)?;
        c.add_item(&mango, 10)
    })?;
    Ok(cart)
}

fn print_receipt(config: &DemoConfig, receipt: &Receipt) -> Result<(), DemoError> {
    println!("{}", receipt);
    println!(
        "Receipt {} total: {}\n",
        receipt.id,
        config.format_money(receipt.total)
    );
    if config.receipt_json {
        println!("{}\n", receipt.to_json()?);
    }
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sama_core=debug` - Cart-level events only
/// - Default: `SAMA_LOG_LEVEL`, else INFO
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shop() {
        let shop = seed_shop("Sama Shop").unwrap();
        assert_eq!(shop.product_count(), SEED_PRODUCTS.len());
        assert_eq!(shop.user_count(), SEED_USERS.len());
        assert_eq!(shop.get_product("Mango").unwrap().quantity(), 50);
    }

    #[test]
    fn test_walkthrough_customers() {
        let mut shop = seed_shop("Sama Shop").unwrap();
        let waiting = fill_second_cart(&mut shop).unwrap();

        let receipt = first_customer(&mut shop).unwrap();
        // Pear 249.99 + 45 × Mango 99.99
        assert_eq!(receipt.total, Money::from_cents(24999 + 45 * 9999));
        assert_eq!(shop.get_product("Mango").unwrap().quantity(), 5);
        assert_eq!(shop.get_product("Apple").unwrap().quantity(), 150);

        let err = shop.checkout(&waiting).unwrap_err();
        assert_eq!(err.shortages().unwrap()[0].product, "Mango");
        assert_eq!(shop.get_product("Cherry").unwrap().quantity(), 200);
        assert_eq!(shop.cart_count(), 1);
    }
}
