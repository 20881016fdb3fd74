//! # Receipt
//!
//! The structured record a successful checkout produces. It freezes the
//! cart lines as they were just before the cart was cleared (snapshot
//! pattern: later price or stock changes do not affect it).
//!
//! ## Rendered Form
//! ```text
//! a@x.com's cart
//!
//! S/N     Item    Qty     Price   Discount        Total
//! 1       Mango   3       99.99   0.00            299.97
//!
//!         Total                                   299.97
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::money::{Discount, Money};

// =============================================================================
// Receipt Line
// =============================================================================

/// One row of a receipt or cart listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    /// 1-based row number.
    pub number: usize,
    /// Product name at time of checkout (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price at time of checkout (frozen).
    pub unit_price: Money,
    pub discount: Discount,
    /// `quantity × unit_price × (1 − discount)`, rounded to cents.
    pub line_total: Money,
}

// =============================================================================
// Receipt
// =============================================================================

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    /// Email of the cart owner, if the cart still had one.
    pub customer: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    pub(crate) fn new(customer: Option<String>, lines: Vec<ReceiptLine>, total: Money) -> Self {
        Receipt {
            id: Uuid::new_v4(),
            customer,
            lines,
            total,
            issued_at: Utc::now(),
        }
    }

    /// Serializes the receipt as pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(customer) = &self.customer {
            writeln!(f, "{}'s cart\n", customer)?;
        }
        write_line_table(f, &self.lines, self.total)
    }
}

/// Writes the item table shared by cart and receipt displays.
///
/// Each row's `line_total` is rounded on its own while `total` is the exact
/// sum rounded once, so the rows can add up to a cent more or less than the
/// printed total.
pub(crate) fn write_line_table(
    f: &mut fmt::Formatter<'_>,
    lines: &[ReceiptLine],
    total: Money,
) -> fmt::Result {
    writeln!(f, "S/N\t\tItem\t\tQty\t\tPrice\t\tDiscount\tTotal")?;
    for line in lines {
        writeln!(
            f,
            "{}\t\t{}\t\t{}\t\t{}\t\t{}\t\t{}",
            line.number, line.name, line.quantity, line.unit_price, line.discount, line.line_total
        )?;
    }
    writeln!(f, "\n\t\tTotal\t\t\t\t\t\t\t\t{}", total)
}

// =============================================================================
// Unit Tests
// =============================================================================
