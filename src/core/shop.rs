//! The store as the UI sees it: an [`Engine`] plus a [`PersistenceGateway`].
//!
//! Operations that change durable state save the whole snapshot right after
//! they commit. Cart operations only touch the session and are never saved, so
//! a restart always comes back idle. A failed save does not undo the commit;
//! it is logged and the shop is marked dirty until a later save succeeds.

use crate::{
    core::{
        cart::Cart,
        engine::{CartAdjustment, Engine, ProductAction},
        model::{Product, ProductDraft, ProductId, SaleRecord, TransactionRecord},
        persistence::PersistenceGateway,
    },
    errors::Result,
};
use tracing::{error, info};

/// Engine plus storage.
#[derive(Debug)]
pub struct Shop<G> {
    engine: Engine,
    gateway: G,
    dirty: bool,
}

impl<G: PersistenceGateway> Shop<G> {
    /// Loads the saved state through `gateway` and starts idle.
    pub async fn open(gateway: G) -> Self {
        let state = gateway.load().await;
        info!(
            products = state.catalog.len(),
            sales = state.ledger.len(),
            transactions = state.log.len(),
            "Shop opened"
        );
        Self {
            engine: Engine::new(state),
            gateway,
            dirty: false,
        }
    }

    /// Read access to the engine for queries and reports.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The storage backend.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// True when the last save failed and memory is ahead of storage.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adds a product and saves.
    pub async fn add_product(&mut self, draft: ProductDraft) -> Product {
        let product = self.engine.add_product(draft);
        self.persist().await;
        product
    }

    /// See [`Engine::product_action`]. Saves only when a unit was sold.
    pub async fn product_action(&mut self, product_id: ProductId) -> Result<ProductAction> {
        let action = self.engine.product_action(product_id)?;
        if matches!(action, ProductAction::Sold(_)) {
            self.persist().await;
        }
        Ok(action)
    }

    /// Sells one unit and saves.
    pub async fn quick_sell(&mut self, product_id: ProductId) -> Result<SaleRecord> {
        let sale = self.engine.quick_sell(product_id)?;
        self.persist().await;
        Ok(sale)
    }

    /// Commits the open cart and saves.
    pub async fn finalize_transaction(&mut self) -> Result<TransactionRecord> {
        let record = self.engine.finalize_transaction()?;
        self.persist().await;
        Ok(record)
    }

    /// Wipes every collection and saves the empty state.
    pub async fn clear_all(&mut self) {
        self.engine.clear_all();
        self.persist().await;
    }

    /// Saves the current state now, clearing the dirty flag on success.
    ///
    /// # Errors
    /// Returns the gateway's error if the save fails.
    pub async fn save(&mut self) -> Result<()> {
        self.gateway.save(self.engine.state()).await?;
        self.dirty = false;
        Ok(())
    }

    /// Opens a cart.
    pub fn start_transaction(&mut self) -> Result<()> {
        self.engine.start_transaction()
    }

    /// Drops the open cart.
    pub fn cancel_transaction(&mut self) -> Result<Cart> {
        self.engine.cancel_transaction()
    }

    /// Adds one unit to the open cart.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32> {
        self.engine.add_to_cart(product_id)
    }

    /// Changes a cart line's quantity.
    pub fn adjust_cart_item(&mut self, product_id: ProductId, delta: i64) -> Result<CartAdjustment> {
        self.engine.adjust_cart_item(product_id, delta)
    }

    async fn persist(&mut self) {
        if let Err(e) = self.save().await {
            error!("Failed to save store, changes are only in memory: {e}");
            self.dirty = true;
        }
    }
}
