//! Transaction engine - the only writer of the catalog, ledger and log.
//!
//! The engine is a two-state machine. In [`Session::Idle`] tapping a product
//! quick-sells one unit; in [`Session::Open`] it stages the product in the
//! cart, and nothing touches stock until [`Engine::finalize_transaction`]
//! commits every line at once. Every rejection leaves the state exactly as it
//! was.
//!
//! The engine is synchronous and knows nothing about storage; the
//! [`crate::core::shop::Shop`] wraps it and persists after each commit.

use crate::{
    core::{
        cart::{Cart, CartItem},
        catalog::Catalog,
        ledger::{SalesLedger, TransactionLog},
        model::{Product, ProductDraft, ProductId, SaleRecord, TransactionRecord},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// The durable state: everything that gets persisted together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Products and stock counters
    pub catalog: Catalog,
    /// Per-unit sales
    pub ledger: SalesLedger,
    /// Finalized checkouts
    pub log: TransactionLog,
}

/// Whether a cart is open. There is at most one cart, by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    /// No sale in progress; product taps quick-sell
    #[default]
    Idle,
    /// A sale is in progress; product taps add to this cart
    Open(Cart),
}

/// What a product tap did.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Quick-sold one unit
    Sold(SaleRecord),
    /// Added one unit to the open cart; holds the line's new quantity
    AddedToCart(u32),
}

/// What a cart quantity adjustment did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAdjustment {
    /// The line now holds this quantity
    Updated(u32),
    /// The quantity dropped to zero or below and the line was removed
    Removed,
}

/// Issues unique, increasing, time-derived ids.
#[derive(Debug, Clone, Default)]
struct IdSequence {
    last: i64,
}

impl IdSequence {
    fn starting_after(last: i64) -> Self {
        Self { last }
    }

    fn next(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last + 1);
        self.last = id;
        id
    }
}

/// State container and state machine for all selling operations.
#[derive(Debug, Clone)]
pub struct Engine {
    state: StoreState,
    session: Session,
    ids: IdSequence,
}

impl Engine {
    /// Creates an idle engine over previously loaded state.
    #[must_use]
    pub fn new(state: StoreState) -> Self {
        let last_id = state
            .catalog
            .max_id()
            .into_iter()
            .chain(state.log.max_id())
            .max()
            .unwrap_or(0);
        Self {
            state,
            session: Session::Idle,
            ids: IdSequence::starting_after(last_id),
        }
    }

    /// Current durable state.
    #[must_use]
    pub const fn state(&self) -> &StoreState {
        &self.state
    }

    /// The open cart, if a sale is in progress.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match &self.session {
            Session::Idle => None,
            Session::Open(cart) => Some(cart),
        }
    }

    /// True while a cart is open.
    #[must_use]
    pub const fn is_transaction_open(&self) -> bool {
        matches!(self.session, Session::Open(_))
    }

    /// Adds a product to the catalog and returns it.
    pub fn add_product(&mut self, draft: ProductDraft) -> Product {
        let now = Utc::now();
        let id = self.ids.next(now);
        let product = self.state.catalog.add_product(id, draft, now).clone();
        info!(product_id = product.id, name = %product.name, stock = product.stock, "Product added");
        product
    }

    /// Opens an empty cart.
    ///
    /// # Errors
    /// [`Error::TransactionAlreadyOpen`] if a cart is already open.
    pub fn start_transaction(&mut self) -> Result<()> {
        if self.is_transaction_open() {
            return Err(Error::TransactionAlreadyOpen);
        }
        self.session = Session::Open(Cart::default());
        debug!("Transaction started");
        Ok(())
    }

    /// Discards the open cart without touching any store, returning it.
    ///
    /// # Errors
    /// [`Error::NoOpenTransaction`] if no cart is open.
    pub fn cancel_transaction(&mut self) -> Result<Cart> {
        match std::mem::take(&mut self.session) {
            Session::Open(cart) => {
                debug!(lines = cart.items().len(), "Transaction cancelled");
                Ok(cart)
            }
            Session::Idle => Err(Error::NoOpenTransaction),
        }
    }

    /// Handles a product tap: quick-sell when idle, add to cart when open.
    ///
    /// # Errors
    /// See [`Engine::quick_sell`] and [`Engine::add_to_cart`].
    pub fn product_action(&mut self, product_id: ProductId) -> Result<ProductAction> {
        if self.is_transaction_open() {
            self.add_to_cart(product_id).map(ProductAction::AddedToCart)
        } else {
            self.quick_sell(product_id).map(ProductAction::Sold)
        }
    }

    /// Sells a single unit directly, bypassing the cart.
    ///
    /// # Errors
    /// - [`Error::TransactionInProgress`] while a cart is open
    /// - [`Error::ProductNotFound`] for an unknown id
    /// - [`Error::InsufficientStock`] when the product is out of stock
    pub fn quick_sell(&mut self, product_id: ProductId) -> Result<SaleRecord> {
        if self.is_transaction_open() {
            return Err(Error::TransactionInProgress);
        }

        let now = Utc::now();
        let product = self.state.catalog.apply_sale_deduction(product_id, 1, now)?;
        let sale = SaleRecord {
            transaction_id: None,
            product_id,
            product_name: product.name.clone(),
            selling_price: product.selling_price,
            cost_price: product.cost_price,
            profit: product.unit_profit(),
            timestamp: now,
        };
        info!(product_id, name = %sale.product_name, remaining = product.stock, "Quick-sold one unit");
        self.state.ledger.append(sale.clone());
        Ok(sale)
    }

    /// Adds one unit of a product to the open cart and returns the line's new quantity.
    ///
    /// # Errors
    /// - [`Error::NoOpenTransaction`] when idle
    /// - [`Error::ProductNotFound`] for an unknown id
    /// - [`Error::InsufficientStock`] when stock cannot cover one more unit
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32> {
        let Session::Open(cart) = &mut self.session else {
            return Err(Error::NoOpenTransaction);
        };
        let product = self
            .state
            .catalog
            .find_by_id(product_id)
            .ok_or_else(|| Error::ProductNotFound {
                name: product_id.to_string(),
            })?;

        let in_cart = cart.quantity_of(product_id);
        if product.stock <= in_cart {
            return Err(Error::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: in_cart + 1,
            });
        }

        let qty = cart.add_one(product);
        debug!(product_id, qty, "Added to cart");
        Ok(qty)
    }

    /// Changes a cart line's quantity by `delta`. Lines that reach zero are removed.
    ///
    /// The ceiling is the product's full stock, since nothing is deducted until
    /// the cart is finalized.
    ///
    /// # Errors
    /// - [`Error::NoOpenTransaction`] when idle
    /// - [`Error::ProductNotFound`] for an unknown id
    /// - [`Error::NotInCart`] when the product has no line
    /// - [`Error::InsufficientStock`] when the new quantity exceeds stock
    pub fn adjust_cart_item(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<CartAdjustment> {
        let Session::Open(cart) = &mut self.session else {
            return Err(Error::NoOpenTransaction);
        };
        let product = self
            .state
            .catalog
            .find_by_id(product_id)
            .ok_or_else(|| Error::ProductNotFound {
                name: product_id.to_string(),
            })?;
        let Some(line) = cart.line(product_id) else {
            return Err(Error::NotInCart {
                product: product.name.clone(),
            });
        };

        let new_qty = i64::from(line.qty).saturating_add(delta);
        if new_qty > i64::from(product.stock) {
            return Err(Error::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: u32::try_from(new_qty).unwrap_or(u32::MAX),
            });
        }

        if new_qty <= 0 {
            cart.remove(product_id);
            debug!(product_id, "Removed from cart");
            return Ok(CartAdjustment::Removed);
        }

        // new_qty is in 1..=stock here, so it fits in u32
        let qty = u32::try_from(new_qty)?;
        cart.set_quantity(product_id, qty);
        debug!(product_id, qty, "Cart quantity changed");
        Ok(CartAdjustment::Updated(qty))
    }

    /// Commits the open cart: deducts stock, records one sale per unit and one
    /// transaction record, then closes the cart.
    ///
    /// Either every line commits or none does. On any failure the stores are
    /// untouched and the cart stays open exactly as it was.
    ///
    /// # Errors
    /// - [`Error::NoOpenTransaction`] when idle
    /// - [`Error::EmptyCart`] when the cart has no lines
    /// - [`Error::ProductNotFound`] / [`Error::InsufficientStock`] when a line
    ///   no longer fits live stock
    pub fn finalize_transaction(&mut self) -> Result<TransactionRecord> {
        let Session::Open(cart) = &self.session else {
            return Err(Error::NoOpenTransaction);
        };
        if cart.is_empty() {
            return Err(Error::EmptyCart);
        }

        // Stage everything against a copy of the catalog; drop it on failure.
        let mut catalog = self.state.catalog.clone();
        let transaction_id = self.ids.clone().next(Utc::now());
        let mut sales = Vec::new();
        let mut total_revenue = 0.0;
        let mut total_profit = 0.0;

        for item in cart.items() {
            catalog.apply_sale_deduction(item.product_id, item.qty, Utc::now())?;
            sales.extend((0..item.qty).map(|_| SaleRecord {
                transaction_id: Some(transaction_id),
                product_id: item.product_id,
                product_name: item.name.clone(),
                selling_price: item.price,
                cost_price: item.cost_price,
                profit: item.price - item.cost_price,
                timestamp: Utc::now(),
            }));
            total_revenue += item.line_total();
            total_profit += item.line_profit();
        }

        let record = TransactionRecord {
            id: transaction_id,
            timestamp: Utc::now(),
            items: cart.items().iter().map(CartItem::to_line).collect(),
            total_revenue,
            total_profit,
        };

        // Commit point: nothing below can fail.
        self.ids = IdSequence::starting_after(transaction_id);
        self.state.catalog = catalog;
        self.state.ledger.extend(sales);
        self.state.log.append(record.clone());
        self.session = Session::Idle;

        info!(
            transaction_id,
            lines = record.items.len(),
            revenue = record.total_revenue,
            profit = record.total_profit,
            "Transaction finalized"
        );
        Ok(record)
    }

    /// Empties catalog, ledger and log together and discards any open cart.
    pub fn clear_all(&mut self) {
        self.state = StoreState::default();
        self.session = Session::Idle;
        info!("All store data cleared");
    }

    #[cfg(test)]
    pub(crate) fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.state.catalog
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::model::Category;

    fn engine_with(cost: f64, price: f64, stock: i64) -> (Engine, ProductId) {
        let mut engine = Engine::new(StoreState::default());
        let product = engine.add_product(
            ProductDraft::new("Piattos", Category::Snacks, cost, price, stock).unwrap(),
        );
        (engine, product.id)
    }

    fn assert_stock_invariant(engine: &Engine) {
        for product in engine.state().catalog.products() {
            let sold_units = engine
                .state()
                .ledger
                .records()
                .iter()
                .filter(|s| s.product_id == product.id)
                .count();
            assert_eq!(product.stock + product.total_sold, product.initial_stock);
            assert_eq!(product.total_sold as usize, sold_units);
        }
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut engine = Engine::new(StoreState::default());
        let draft = ProductDraft::new("A", Category::Other, 1.0, 2.0, 1).unwrap();
        let first = engine.add_product(draft.clone()).id;
        let second = engine.add_product(draft).id;
        assert!(second > first);
    }

    #[test]
    fn test_new_engine_continues_after_loaded_ids() {
        let (engine, _) = engine_with(1.0, 2.0, 1);
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let mut state = engine.state().clone();
        state.catalog = Catalog::from_products(
            state
                .catalog
                .products()
                .iter()
                .cloned()
                .map(|mut p| {
                    p.id = far_future;
                    p
                })
                .collect(),
        );

        let mut reloaded = Engine::new(state);
        let draft = ProductDraft::new("B", Category::Other, 1.0, 2.0, 1).unwrap();
        assert_eq!(reloaded.add_product(draft).id, far_future + 1);
    }

    #[test]
    fn test_quick_sell_scenario_then_cart_checkout() {
        let (mut engine, id) = engine_with(15.0, 20.0, 10);

        // Quick-sell once
        let sale = engine.quick_sell(id).unwrap();
        assert_eq!(sale.profit, 5.0);
        assert!(sale.transaction_id.is_none());
        let product = engine.state().catalog.find_by_id(id).unwrap();
        assert_eq!(product.stock, 9);
        assert_eq!(product.total_sold, 1);
        assert!(product.last_sold.is_some());
        assert_eq!(engine.state().ledger.len(), 1);

        // Cart with the same product x3
        engine.start_transaction().unwrap();
        for _ in 0..3 {
            engine.product_action(id).unwrap();
        }
        assert_eq!(engine.cart().unwrap().quantity_of(id), 3);

        let record = engine.finalize_transaction().unwrap();
        assert_eq!(record.total_revenue, 60.0);
        assert_eq!(record.total_profit, 15.0);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].qty, 3);

        let product = engine.state().catalog.find_by_id(id).unwrap();
        assert_eq!(product.stock, 6);
        assert_eq!(product.total_sold, 4);

        let ledger = &engine.state().ledger;
        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.for_transaction(record.id).count(), 3);
        assert!(ledger.for_transaction(record.id).all(|s| s.profit == 5.0));
        assert_eq!(engine.state().log.len(), 1);
        assert!(!engine.is_transaction_open());
        assert_stock_invariant(&engine);
    }

    #[test]
    fn test_quick_sell_out_of_stock_changes_nothing() {
        let (mut engine, id) = engine_with(15.0, 20.0, 0);
        let before = engine.state().clone();

        let result = engine.quick_sell(id);
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            })
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_quick_sell_rejected_while_cart_open() {
        let (mut engine, id) = engine_with(15.0, 20.0, 5);
        engine.start_transaction().unwrap();
        assert!(matches!(
            engine.quick_sell(id),
            Err(Error::TransactionInProgress)
        ));
        // The tap goes to the cart instead
        assert_eq!(
            engine.product_action(id).unwrap(),
            ProductAction::AddedToCart(1)
        );
    }

    #[test]
    fn test_unknown_product() {
        let (mut engine, _) = engine_with(1.0, 2.0, 5);
        assert!(matches!(
            engine.quick_sell(42),
            Err(Error::ProductNotFound { .. })
        ));
        engine.start_transaction().unwrap();
        assert!(matches!(
            engine.add_to_cart(42),
            Err(Error::ProductNotFound { .. })
        ));
    }

    #[test]
    fn test_start_twice_keeps_existing_cart() {
        let (mut engine, id) = engine_with(1.0, 2.0, 5);
        engine.start_transaction().unwrap();
        engine.add_to_cart(id).unwrap();

        assert!(matches!(
            engine.start_transaction(),
            Err(Error::TransactionAlreadyOpen)
        ));
        assert_eq!(engine.cart().unwrap().quantity_of(id), 1);
    }

    #[test]
    fn test_cart_operations_require_open_transaction() {
        let (mut engine, id) = engine_with(1.0, 2.0, 5);
        assert!(matches!(
            engine.add_to_cart(id),
            Err(Error::NoOpenTransaction)
        ));
        assert!(matches!(
            engine.adjust_cart_item(id, 1),
            Err(Error::NoOpenTransaction)
        ));
        assert!(matches!(
            engine.finalize_transaction(),
            Err(Error::NoOpenTransaction)
        ));
        assert!(matches!(
            engine.cancel_transaction(),
            Err(Error::NoOpenTransaction)
        ));
    }

    #[test]
    fn test_add_to_cart_stops_at_stock() {
        let (mut engine, id) = engine_with(1.0, 2.0, 2);
        engine.start_transaction().unwrap();
        assert_eq!(engine.add_to_cart(id).unwrap(), 1);
        assert_eq!(engine.add_to_cart(id).unwrap(), 2);

        let cart_before = engine.cart().unwrap().clone();
        assert!(matches!(
            engine.add_to_cart(id),
            Err(Error::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(engine.cart().unwrap(), &cart_before);
    }

    #[test]
    fn test_add_to_cart_requires_stock_for_new_line() {
        let (mut engine, id) = engine_with(1.0, 2.0, 0);
        engine.start_transaction().unwrap();
        assert!(matches!(
            engine.add_to_cart(id),
            Err(Error::InsufficientStock { .. })
        ));
        assert!(engine.cart().unwrap().is_empty());
    }

    #[test]
    fn test_adjust_cart_item() {
        let (mut engine, id) = engine_with(1.0, 2.0, 3);
        engine.start_transaction().unwrap();
        engine.add_to_cart(id).unwrap();

        assert_eq!(
            engine.adjust_cart_item(id, 1).unwrap(),
            CartAdjustment::Updated(2)
        );
        assert_eq!(
            engine.adjust_cart_item(id, 1).unwrap(),
            CartAdjustment::Updated(3)
        );

        // Stock is the ceiling
        assert!(matches!(
            engine.adjust_cart_item(id, 1),
            Err(Error::InsufficientStock { requested: 4, .. })
        ));
        assert_eq!(engine.cart().unwrap().quantity_of(id), 3);

        // Dropping to zero removes the line
        assert_eq!(
            engine.adjust_cart_item(id, -3).unwrap(),
            CartAdjustment::Removed
        );
        assert!(engine.cart().unwrap().line(id).is_none());

        assert!(matches!(
            engine.adjust_cart_item(id, 1),
            Err(Error::NotInCart { .. })
        ));
    }

    #[test]
    fn test_cancel_restores_original_state() {
        let (mut engine, id) = engine_with(15.0, 20.0, 10);
        engine.quick_sell(id).unwrap();
        let before = engine.state().clone();

        engine.start_transaction().unwrap();
        for _ in 0..5 {
            engine.product_action(id).unwrap();
        }
        let cart = engine.cancel_transaction().unwrap();
        assert_eq!(cart.quantity_of(id), 5);

        assert_eq!(engine.state(), &before);
        assert!(engine.cart().is_none());
    }

    #[test]
    fn test_finalize_empty_cart_is_rejected() {
        let (mut engine, _) = engine_with(1.0, 2.0, 5);
        engine.start_transaction().unwrap();
        assert!(matches!(
            engine.finalize_transaction(),
            Err(Error::EmptyCart)
        ));
        assert!(engine.is_transaction_open());
        assert!(engine.state().log.is_empty());
    }

    #[test]
    fn test_finalize_aborts_when_stock_shrank() {
        let (mut engine, id) = engine_with(15.0, 20.0, 5);
        let other = engine
            .add_product(ProductDraft::new("Nova", Category::Snacks, 8.0, 10.0, 5).unwrap())
            .id;

        engine.start_transaction().unwrap();
        engine.add_to_cart(other).unwrap();
        engine.add_to_cart(id).unwrap();
        engine.add_to_cart(id).unwrap();

        // Stock reduced behind the cart's back
        engine.catalog_mut().product_mut(id).unwrap().stock = 1;
        let state_before = engine.state().clone();
        let cart_before = engine.cart().unwrap().clone();

        let result = engine.finalize_transaction();
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            })
        ));
        assert_eq!(engine.state(), &state_before);
        assert_eq!(engine.cart().unwrap(), &cart_before);
        assert_eq!(engine.cart().unwrap().quantity_of(id), 2);
    }

    #[test]
    fn test_finalize_multi_line_totals_and_revenue_consistency() {
        let (mut engine, chips) = engine_with(15.0, 20.0, 10);
        let soda = engine
            .add_product(ProductDraft::new("RC Cola", Category::Beverages, 10.0, 12.5, 10).unwrap())
            .id;

        for round in 0..3 {
            engine.start_transaction().unwrap();
            engine.add_to_cart(chips).unwrap();
            for _ in 0..=round {
                engine.add_to_cart(soda).unwrap();
            }
            engine.finalize_transaction().unwrap();
            engine.quick_sell(soda).unwrap();
        }

        let log_revenue: f64 = engine
            .state()
            .log
            .records()
            .iter()
            .map(|t| t.total_revenue)
            .sum();
        let ledger_revenue: f64 = engine
            .state()
            .ledger
            .records()
            .iter()
            .filter(|s| s.transaction_id.is_some())
            .map(|s| s.selling_price)
            .sum();
        assert_eq!(log_revenue, ledger_revenue);
        assert_eq!(log_revenue, 3.0 * 20.0 + 6.0 * 12.5);

        let first = &engine.state().log.records()[0];
        assert_eq!(first.items[0].product_id, chips);
        assert_eq!(first.items[1].product_id, soda);
        assert_eq!(first.total_profit, 5.0 + 2.5);
        assert_stock_invariant(&engine);
    }

    #[test]
    fn test_transaction_ids_are_distinct() {
        let (mut engine, id) = engine_with(1.0, 2.0, 10);
        let mut ids = Vec::new();
        for _ in 0..3 {
            engine.start_transaction().unwrap();
            engine.add_to_cart(id).unwrap();
            ids.push(engine.finalize_transaction().unwrap().id);
        }
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
        assert!(ids[0] > id);
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let (mut engine, id) = engine_with(1.0, 2.0, 10);
        engine.quick_sell(id).unwrap();
        engine.start_transaction().unwrap();
        engine.add_to_cart(id).unwrap();
        engine.finalize_transaction().unwrap();
        engine.start_transaction().unwrap();

        engine.clear_all();
        assert_eq!(engine.state(), &StoreState::default());
        assert!(!engine.is_transaction_open());
    }
}
