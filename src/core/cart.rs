//! The in-progress sale: staged items that have not touched stock yet.

use crate::core::model::{Product, ProductId, TransactionLine};

/// A staged line. Prices are captured when the product is first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Product being bought
    pub product_id: ProductId,
    /// Name snapshot
    pub name: String,
    /// Selling price snapshot
    pub price: f64,
    /// Cost price snapshot
    pub cost_price: f64,
    /// Units requested, always at least 1
    pub qty: u32,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.selling_price,
            cost_price: product.cost_price,
            qty: 1,
        }
    }

    /// `qty × price`
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.qty) * self.price
    }

    /// `qty × (price − cost)`
    #[must_use]
    pub fn line_profit(&self) -> f64 {
        f64::from(self.qty) * (self.price - self.cost_price)
    }

    pub(crate) fn to_line(&self) -> TransactionLine {
        TransactionLine {
            product_id: self.product_id,
            name: self.name.clone(),
            qty: self.qty,
            price: self.price,
        }
    }
}

/// Ordered cart lines, at most one per product. An empty cart is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// True when nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Units requested for `product_id` (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |i| i.qty)
    }

    /// Σ qty
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }

    /// Σ qty × price
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Adds one unit: a new line with qty 1, or qty + 1 on the existing line.
    /// Returns the new quantity. Stock checks are the engine's job.
    pub(crate) fn add_one(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.qty += 1;
            item.qty
        } else {
            self.items.push(CartItem::from_product(product));
            1
        }
    }

    pub(crate) fn set_quantity(&mut self, product_id: ProductId, qty: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.qty = qty;
        }
    }

    pub(crate) fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }
}
