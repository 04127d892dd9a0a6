//! Domain records for the store: products, categories, sales and checkouts.
//!
//! These are the in-memory shapes the engine works with. Field names serialize
//! in camelCase so exported snapshots keep the store's established format.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Product identifier: milliseconds since the epoch at creation, kept unique.
pub type ProductId = i64;

/// Checkout identifier, drawn from the same sequence as product ids.
pub type TransactionId = i64;

/// Fixed set of shelf categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Soft drinks, juices, water
    Beverages,
    /// Instant noodles
    Noodles,
    /// Chips and crackers
    Snacks,
    /// Canned goods
    Canned,
    /// Coffee and tea
    Coffee,
    /// Dairy and eggs
    Dairy,
    /// Condiments
    Condiments,
    /// Personal care
    Personal,
    /// First aid
    FirstAid,
    /// Household supplies
    Household,
    /// Candy and sweets
    Candy,
    /// Cigarettes
    Cigarettes,
    /// Catch-all
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 13] = [
        Self::Beverages,
        Self::Noodles,
        Self::Snacks,
        Self::Canned,
        Self::Coffee,
        Self::Dairy,
        Self::Condiments,
        Self::Personal,
        Self::FirstAid,
        Self::Household,
        Self::Candy,
        Self::Cigarettes,
        Self::Other,
    ];

    /// Storage key, e.g. `"firstaid"`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Beverages => "beverages",
            Self::Noodles => "noodles",
            Self::Snacks => "snacks",
            Self::Canned => "canned",
            Self::Coffee => "coffee",
            Self::Dairy => "dairy",
            Self::Condiments => "condiments",
            Self::Personal => "personal",
            Self::FirstAid => "firstaid",
            Self::Household => "household",
            Self::Candy => "candy",
            Self::Cigarettes => "cigarettes",
            Self::Other => "other",
        }
    }

    /// Human-readable name, e.g. `"Coffee & Tea"`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Beverages => "Beverages",
            Self::Noodles => "Noodles",
            Self::Snacks => "Snacks",
            Self::Canned => "Canned Goods",
            Self::Coffee => "Coffee & Tea",
            Self::Dairy => "Dairy & Eggs",
            Self::Condiments => "Condiments",
            Self::Personal => "Personal Care",
            Self::FirstAid => "First Aid",
            Self::Household => "Household",
            Self::Candy => "Candy & Sweets",
            Self::Cigarettes => "Cigarettes",
            Self::Other => "Other",
        }
    }

    /// Looks a category up by its storage key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Like [`Category::from_key`], but unknown keys fall back to [`Category::Other`].
    #[must_use]
    pub fn from_key_or_other(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts either the key or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.display_name().to_lowercase() == wanted)
            .ok_or_else(|| Error::validation(format!("Unknown category '{}'", s.trim())))
    }
}

/// A catalog entry with its stock counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, time-derived id
    pub id: ProductId,
    /// Shelf category
    pub category: Category,
    /// Display name
    pub name: String,
    /// What the store pays per unit
    pub cost_price: f64,
    /// What the customer pays per unit
    pub selling_price: f64,
    /// Units on hand
    pub stock: u32,
    /// Units on hand when the product was added
    pub initial_stock: u32,
    /// Units sold since creation
    pub total_sold: u32,
    /// When the last unit was sold
    pub last_sold: Option<DateTime<Utc>>,
    /// When the product was added
    pub date_added: DateTime<Utc>,
}

impl Product {
    /// Profit made on one unit at current prices.
    #[must_use]
    pub fn unit_profit(&self) -> f64 {
        self.selling_price - self.cost_price
    }
}

/// Validated input for adding a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Trimmed, non-empty name
    pub name: String,
    /// Shelf category
    pub category: Category,
    /// Non-negative cost price
    pub cost_price: f64,
    /// Non-negative selling price
    pub selling_price: f64,
    /// Starting stock
    pub initial_stock: u32,
}

impl ProductDraft {
    /// Builds a draft from typed values.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is blank, a price is negative
    /// or not finite, or the stock is negative or too large.
    pub fn new(
        name: &str,
        category: Category,
        cost_price: f64,
        selling_price: f64,
        initial_stock: i64,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Product name cannot be empty"));
        }
        validate_price("Cost price", cost_price)?;
        validate_price("Selling price", selling_price)?;
        if initial_stock < 0 {
            return Err(Error::validation("Initial stock cannot be negative"));
        }
        let initial_stock = u32::try_from(initial_stock)
            .map_err(|_| Error::validation("Initial stock is too large"))?;

        Ok(Self {
            name: name.to_string(),
            category,
            cost_price,
            selling_price,
            initial_stock,
        })
    }

    /// Builds a draft from raw form text, as typed by the user.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a price is not a number, the stock is
    /// not a whole number, or [`ProductDraft::new`] rejects the values.
    pub fn parse(
        name: &str,
        category: Category,
        cost_price: &str,
        selling_price: &str,
        initial_stock: &str,
    ) -> Result<Self> {
        let cost = parse_number("Cost price", cost_price)?;
        let selling = parse_number("Selling price", selling_price)?;
        let stock: i64 = initial_stock.trim().parse().map_err(|_| {
            Error::validation(format!(
                "Initial stock must be a whole number, got '{}'",
                initial_stock.trim()
            ))
        })?;
        Self::new(name, category, cost, selling, stock)
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::validation(format!("{field} must be a number, got '{}'", raw.trim())))
}

fn validate_price(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::validation(format!("{field} must be a valid number")));
    }
    if value < 0.0 {
        return Err(Error::validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// One unit sold. Quick-sells carry no transaction id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Parent checkout, if sold through a cart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// Product sold
    pub product_id: ProductId,
    /// Name at time of sale
    pub product_name: String,
    /// Selling price at time of sale
    pub selling_price: f64,
    /// Cost price at time of sale
    pub cost_price: f64,
    /// `selling_price - cost_price`
    pub profit: f64,
    /// When the unit was sold
    pub timestamp: DateTime<Utc>,
}

/// One line of a finalized checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    /// Product sold
    pub product_id: ProductId,
    /// Name at time of sale
    pub name: String,
    /// Units sold
    pub qty: u32,
    /// Unit selling price at time of sale
    pub price: f64,
}

/// A finalized multi-item checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Checkout id, shared by its sale records
    pub id: TransactionId,
    /// When the checkout completed
    pub timestamp: DateTime<Utc>,
    /// Lines in cart order
    pub items: Vec<TransactionLine>,
    /// Σ qty × price
    pub total_revenue: f64,
    /// Σ qty × (price − cost)
    pub total_profit: f64,
}
