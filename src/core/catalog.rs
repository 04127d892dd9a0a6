//! Catalog store - the authoritative product collection and its stock counters.
//!
//! Products are kept in insertion order, which doubles as the default display
//! order. Only the transaction engine mutates the catalog.

use crate::{
    core::model::{Category, Product, ProductDraft, ProductId},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered collection of products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps an already-ordered list of products, e.g. one loaded from storage.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Returns the product with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns the first product (in insertion order) whose name matches, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        let wanted = name.trim().to_lowercase();
        self.products
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Groups products by category, categories in display order, products in
    /// insertion order. Empty categories are skipped.
    #[must_use]
    pub fn by_category(&self) -> Vec<(Category, Vec<&Product>)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let products: Vec<&Product> = self
                    .products
                    .iter()
                    .filter(|p| p.category == category)
                    .collect();
                (!products.is_empty()).then_some((category, products))
            })
            .collect()
    }

    /// Appends a new product built from `draft` with the given id.
    pub(crate) fn add_product(
        &mut self,
        id: ProductId,
        draft: ProductDraft,
        now: DateTime<Utc>,
    ) -> &Product {
        let index = self.products.len();
        self.products.push(Product {
            id,
            category: draft.category,
            name: draft.name,
            cost_price: draft.cost_price,
            selling_price: draft.selling_price,
            stock: draft.initial_stock,
            initial_stock: draft.initial_stock,
            total_sold: 0,
            last_sold: None,
            date_added: now,
        });
        &self.products[index]
    }

    /// Removes `quantity` units from stock and records them as sold.
    ///
    /// Asking for more than is in stock is rejected, never clamped.
    pub(crate) fn apply_sale_deduction(
        &mut self,
        id: ProductId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<&Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProductNotFound {
                name: id.to_string(),
            })?;

        if quantity > product.stock {
            return Err(Error::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: quantity,
            });
        }

        product.stock -= quantity;
        product.total_sold += quantity;
        product.last_sold = Some(now);
        Ok(&*product)
    }

    /// Highest product id, if any.
    pub(crate) fn max_id(&self) -> Option<ProductId> {
        self.products.iter().map(|p| p.id).max()
    }

    #[cfg(test)]
    pub(crate) fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }
}
