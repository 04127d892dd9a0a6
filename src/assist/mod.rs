//! Advisory AI collaborators.
//!
//! Neither collaborator ever mutates the store. Image analysis pre-fills an
//! add-product suggestion that the user still has to submit, and insights are
//! only displayed. Both are traits so the bot can run without an API key and
//! tests can use canned implementations.

/// Gemini REST client implementing both collaborators
pub mod gemini;

use crate::{
    config::store::InsightsConfig,
    core::{
        engine::StoreState,
        model::{Category, Product, SaleRecord},
    },
    errors::Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields suggested from a product photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSuggestion {
    /// Product name as read from the packaging
    pub name: String,
    /// Always one of the known categories; unknown ones become `Other`
    pub category: Category,
    /// Estimated cost price in PHP
    pub cost_price: f64,
    /// Estimated selling price in PHP
    pub selling_price: f64,
}

/// Dashboard insights text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInsights {
    /// Best sellers
    pub top_selling: String,
    /// Most profitable items or categories
    pub profit_analysis: String,
    /// One actionable suggestion
    pub ai_recommendations: String,
}

/// Product fields sent for insights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ProductSample {
    pub name: String,
    pub stock: u32,
    pub total_sold: u32,
    pub cost_price: f64,
    pub selling_price: f64,
    pub last_sold: Option<DateTime<Utc>>,
}

/// Sale fields sent for insights.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SaleSample {
    pub product_name: String,
    pub profit: f64,
    pub timestamp: DateTime<Utc>,
}

/// Bounded, owned slice of the store handed to [`InsightsProvider`].
///
/// Built while holding the shop lock, then sent without it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSample {
    /// First products of the catalog
    pub inventory: Vec<ProductSample>,
    /// Most recent sales, oldest first
    pub sales: Vec<SaleSample>,
}

impl InsightSample {
    /// Takes the configured number of products and recent sales from `state`.
    #[must_use]
    pub fn from_state(state: &StoreState, limits: &InsightsConfig) -> Self {
        Self {
            inventory: state
                .catalog
                .products()
                .iter()
                .take(limits.product_sample)
                .map(ProductSample::from)
                .collect(),
            sales: state
                .ledger
                .recent(limits.sales_sample)
                .iter()
                .map(SaleSample::from)
                .collect(),
        }
    }

    /// True when there is nothing worth analysing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty() && self.sales.is_empty()
    }
}

impl From<&Product> for ProductSample {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            stock: product.stock,
            total_sold: product.total_sold,
            cost_price: product.cost_price,
            selling_price: product.selling_price,
            last_sold: product.last_sold,
        }
    }
}

impl From<&SaleRecord> for SaleSample {
    fn from(sale: &SaleRecord) -> Self {
        Self {
            product_name: sale.product_name.clone(),
            profit: sale.profit,
            timestamp: sale.timestamp,
        }
    }
}

/// Suggests product fields from a photo.
#[async_trait]
pub trait ProductAnalyzer: Send + Sync {
    /// Analyses one image.
    ///
    /// # Errors
    /// [`crate::errors::Error::ExternalService`] when the service is
    /// unreachable or its reply is malformed.
    async fn analyze_image(&self, image: &[u8], mime_type: &str) -> Result<ProductSuggestion>;
}

/// Produces dashboard insights from a sample of the store.
#[async_trait]
pub trait InsightsProvider: Send + Sync {
    /// Generates insights for `sample`.
    ///
    /// # Errors
    /// [`crate::errors::Error::ExternalService`] when the service is
    /// unreachable or its reply is malformed.
    async fn generate_insights(&self, sample: &InsightSample) -> Result<StoreInsights>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{engine::Engine, model::ProductDraft};

    #[test]
    fn test_sample_respects_limits() {
        let mut engine = Engine::new(StoreState::default());
        for i in 0..5 {
            let id = engine
                .add_product(
                    ProductDraft::new(&format!("Item {i}"), Category::Snacks, 1.0, 2.0, 10).unwrap(),
                )
                .id;
            engine.quick_sell(id).unwrap();
            engine.quick_sell(id).unwrap();
        }

        let limits = InsightsConfig {
            product_sample: 3,
            sales_sample: 4,
        };
        let sample = InsightSample::from_state(engine.state(), &limits);

        assert_eq!(sample.inventory.len(), 3);
        assert_eq!(sample.inventory[0].name, "Item 0");
        assert_eq!(sample.inventory[0].total_sold, 2);
        assert_eq!(sample.sales.len(), 4);
        // The four most recent sales are the last two items, twice each
        assert_eq!(sample.sales[0].product_name, "Item 3");
        assert_eq!(sample.sales[3].product_name, "Item 4");
    }

    #[test]
    fn test_empty_store_gives_empty_sample() {
        let sample = InsightSample::from_state(&StoreState::default(), &InsightsConfig::default());
        assert!(sample.is_empty());
    }
}
