//! # Demo Configuration
//!
//! Settings for the demo walkthrough.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SAMA_*`)
//! 2. Defaults (this file)
//!
//! `RUST_LOG`, when set, overrides `log_level` entirely.

use sama_core::Money;
use serde::{Deserialize, Serialize};

/// Demo configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoConfig {
    /// Shop name shown at the top of the shop listing
    pub shop_name: String,

    /// Prefix for printed amounts; empty prints bare numbers
    pub currency_symbol: String,

    /// Default tracing filter directive
    pub log_level: String,

    /// Also print every receipt as JSON
    pub receipt_json: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            shop_name: "Sama Shop".to_string(),
            currency_symbol: String::new(),
            log_level: "info".to_string(),
            receipt_json: false,
        }
    }
}

impl DemoConfig {
    /// Creates a DemoConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SAMA_SHOP_NAME`: Override shop name
    /// - `SAMA_CURRENCY_SYMBOL`: Prefix amounts (e.g. "$")
    /// - `SAMA_LOG_LEVEL`: Default tracing filter (e.g. "debug")
    /// - `SAMA_RECEIPT_JSON`: "1" or "true" to print receipts as JSON
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DemoConfig::default();

        if let Some(name) = lookup("SAMA_SHOP_NAME") {
            config.shop_name = name;
        }

        if let Some(symbol) = lookup("SAMA_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(level) = lookup("SAMA_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(flag) = lookup("SAMA_RECEIPT_JSON") {
            config.receipt_json = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true");
        }

        config
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use sama_core::Money;
    /// use sama_demo_lib::config::DemoConfig;
    ///
    /// let config = DemoConfig { currency_symbol: "$".to_string(), ..DemoConfig::default() };
    /// assert_eq!(config.format_money(Money::from_cents(-1234)), "-$12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.major().abs(),
            amount.minor()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DemoConfig::from_lookup(|_| None);
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.format_money(Money::from_cents(29997)), "299.97");
    }

    #[test]
    fn test_overrides() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("SAMA_SHOP_NAME", "Corner Shop"),
            ("SAMA_CURRENCY_SYMBOL", "$"),
            ("SAMA_LOG_LEVEL", "debug"),
            ("SAMA_RECEIPT_JSON", "TRUE"),
        ]));

        assert_eq!(config.shop_name, "Corner Shop");
        assert_eq!(config.log_level, "debug");
        assert!(config.receipt_json);
        assert_eq!(config.format_money(Money::from_cents(100)), "$1.00");
    }

    #[test]
    fn test_receipt_json_flag_is_strict() {
        let config = DemoConfig::from_lookup(lookup_from(&[("SAMA_RECEIPT_JSON", "yes")]));
        assert!(!config.receipt_json);
    }
}
