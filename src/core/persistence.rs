//! Persistence gateway - durable snapshots of the three store collections.
//!
//! The engine never talks to storage directly. After each committing mutation
//! the [`crate::core::shop::Shop`] hands the whole [`StoreState`] to a
//! [`PersistenceGateway`], which writes catalog, ledger and log together or
//! not at all. Loading never fails: a collection that is missing or unreadable
//! comes back empty and the problem is logged.

use crate::{
    core::{
        catalog::Catalog,
        engine::StoreState,
        ledger::{SalesLedger, TransactionLog},
        model::{Category, Product, SaleRecord, TransactionLine, TransactionRecord},
    },
    entities::{
        Product as ProductEntity, ProductColumn, ProductModel, Sale, SaleColumn, SaleModel,
        Transaction, TransactionColumn, TransactionItem, TransactionItemModel, TransactionModel,
        product, sale, transaction, transaction_item,
    },
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, warn};

/// Rows per INSERT statement, kept well under `SQLite`'s bound-parameter limit.
const INSERT_CHUNK_SIZE: usize = 100;

/// Durable storage for the store's three collections.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Reads the last saved state. Missing or corrupt collections load as empty.
    async fn load(&self) -> StoreState;

    /// Replaces the saved state with `state`, atomically.
    ///
    /// # Errors
    /// Returns an error if the write fails; nothing is partially saved.
    async fn save(&self, state: &StoreState) -> Result<()>;
}

/// `SQLite` gateway backed by `SeaORM`.
#[derive(Debug)]
pub struct DatabaseGateway {
    db: DatabaseConnection,
}

impl DatabaseGateway {
    /// Wraps a connection whose tables already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl PersistenceGateway for DatabaseGateway {
    async fn load(&self) -> StoreState {
        let catalog = load_catalog(&self.db).await.unwrap_or_else(|e| {
            warn!("Could not load catalog, starting empty: {e}");
            Catalog::default()
        });
        let ledger = load_ledger(&self.db).await.unwrap_or_else(|e| {
            warn!("Could not load sales ledger, starting empty: {e}");
            SalesLedger::default()
        });
        let log = load_transaction_log(&self.db).await.unwrap_or_else(|e| {
            warn!("Could not load transaction log, starting empty: {e}");
            TransactionLog::default()
        });

        debug!(
            products = catalog.len(),
            sales = ledger.len(),
            transactions = log.len(),
            "Store loaded"
        );
        StoreState {
            catalog,
            ledger,
            log,
        }
    }

    async fn save(&self, state: &StoreState) -> Result<()> {
        let product_rows: Vec<product::ActiveModel> =
            state.catalog.products().iter().map(product_row).collect();
        let sale_rows: Vec<sale::ActiveModel> =
            state.ledger.records().iter().map(sale_row).collect();
        let transaction_rows: Vec<transaction::ActiveModel> =
            state.log.records().iter().map(transaction_row).collect();
        let item_rows = state
            .log
            .records()
            .iter()
            .map(transaction_item_rows)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        // Dropping the transaction on any early return rolls everything back.
        let txn = self.db.begin().await?;
        TransactionItem::delete_many().exec(&txn).await?;
        Transaction::delete_many().exec(&txn).await?;
        Sale::delete_many().exec(&txn).await?;
        ProductEntity::delete_many().exec(&txn).await?;

        insert_in_chunks(&txn, product_rows).await?;
        insert_in_chunks(&txn, sale_rows).await?;
        insert_in_chunks(&txn, transaction_rows).await?;
        insert_in_chunks(&txn, item_rows).await?;
        txn.commit().await?;

        debug!(
            products = state.catalog.len(),
            sales = state.ledger.len(),
            transactions = state.log.len(),
            "Store saved"
        );
        Ok(())
    }
}

async fn insert_in_chunks<A>(txn: &DatabaseTransaction, rows: Vec<A>) -> Result<()>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows.by_ref().take(INSERT_CHUNK_SIZE).collect();
        <A::Entity as EntityTrait>::insert_many(chunk)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

async fn load_catalog(db: &DatabaseConnection) -> Result<Catalog> {
    let rows = ProductEntity::find()
        .order_by_asc(ProductColumn::Id)
        .all(db)
        .await?;
    let products = rows
        .into_iter()
        .map(product_from_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(Catalog::from_products(products))
}

async fn load_ledger(db: &DatabaseConnection) -> Result<SalesLedger> {
    let rows = Sale::find().order_by_asc(SaleColumn::Id).all(db).await?;
    Ok(SalesLedger::from_records(
        rows.into_iter().map(sale_from_row).collect(),
    ))
}

async fn load_transaction_log(db: &DatabaseConnection) -> Result<TransactionLog> {
    let rows = Transaction::find()
        .find_with_related(TransactionItem)
        .order_by_asc(TransactionColumn::Id)
        .all(db)
        .await?;
    let records = rows
        .into_iter()
        .map(|(row, items)| transaction_from_rows(row, items))
        .collect::<Result<Vec<_>>>()?;
    Ok(TransactionLog::from_records(records))
}

fn product_row(product: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(product.id),
        category: Set(product.category.key().to_string()),
        name: Set(product.name.clone()),
        cost_price: Set(product.cost_price),
        selling_price: Set(product.selling_price),
        stock: Set(i64::from(product.stock)),
        initial_stock: Set(i64::from(product.initial_stock)),
        total_sold: Set(i64::from(product.total_sold)),
        last_sold: Set(product.last_sold),
        date_added: Set(product.date_added),
    }
}

fn product_from_row(row: ProductModel) -> Result<Product> {
    let category = Category::from_key(&row.category).unwrap_or_else(|| {
        warn!(product_id = row.id, category = %row.category, "Unknown stored category, using Other");
        Category::Other
    });
    Ok(Product {
        id: row.id,
        category,
        name: row.name,
        cost_price: row.cost_price,
        selling_price: row.selling_price,
        stock: u32::try_from(row.stock)?,
        initial_stock: u32::try_from(row.initial_stock)?,
        total_sold: u32::try_from(row.total_sold)?,
        last_sold: row.last_sold,
        date_added: row.date_added,
    })
}

fn sale_row(sale: &SaleRecord) -> sale::ActiveModel {
    sale::ActiveModel {
        transaction_id: Set(sale.transaction_id),
        product_id: Set(sale.product_id),
        product_name: Set(sale.product_name.clone()),
        selling_price: Set(sale.selling_price),
        cost_price: Set(sale.cost_price),
        profit: Set(sale.profit),
        timestamp: Set(sale.timestamp),
        ..Default::default()
    }
}

fn sale_from_row(row: SaleModel) -> SaleRecord {
    SaleRecord {
        transaction_id: row.transaction_id,
        product_id: row.product_id,
        product_name: row.product_name,
        selling_price: row.selling_price,
        cost_price: row.cost_price,
        profit: row.profit,
        timestamp: row.timestamp,
    }
}

fn transaction_row(record: &TransactionRecord) -> transaction::ActiveModel {
    transaction::ActiveModel {
        id: Set(record.id),
        timestamp: Set(record.timestamp),
        total_revenue: Set(record.total_revenue),
        total_profit: Set(record.total_profit),
    }
}

fn transaction_item_rows(record: &TransactionRecord) -> Result<Vec<transaction_item::ActiveModel>> {
    record
        .items
        .iter()
        .enumerate()
        .map(|(position, line)| -> Result<transaction_item::ActiveModel> {
            Ok(transaction_item::ActiveModel {
                transaction_id: Set(record.id),
                position: Set(i32::try_from(position)?),
                product_id: Set(line.product_id),
                name: Set(line.name.clone()),
                qty: Set(i64::from(line.qty)),
                price: Set(line.price),
                ..Default::default()
            })
        })
        .collect()
}

fn transaction_from_rows(
    row: TransactionModel,
    mut items: Vec<TransactionItemModel>,
) -> Result<TransactionRecord> {
    items.sort_by_key(|item| item.position);
    let items = items
        .into_iter()
        .map(|item| -> Result<TransactionLine> {
            Ok(TransactionLine {
                product_id: item.product_id,
                name: item.name,
                qty: u32::try_from(item.qty)?,
                price: item.price,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TransactionRecord {
        id: row.id,
        timestamp: row.timestamp,
        items,
        total_revenue: row.total_revenue,
        total_profit: row.total_profit,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{engine::Engine, model::ProductDraft},
        test_utils::setup_test_db,
    };
    use sea_orm::{ConnectionTrait, DatabaseBackend, MockDatabase, Statement};

    fn busy_engine() -> Engine {
        let mut engine = Engine::new(StoreState::default());
        let coke = engine
            .add_product(ProductDraft::new("Coke 1.5L", Category::Beverages, 60.0, 75.0, 12).unwrap())
            .id;
        let bandage = engine
            .add_product(ProductDraft::new("Band-Aid", Category::FirstAid, 3.0, 5.0, 40).unwrap())
            .id;

        engine.quick_sell(coke).unwrap();
        engine.start_transaction().unwrap();
        engine.add_to_cart(bandage).unwrap();
        engine.add_to_cart(coke).unwrap();
        engine.adjust_cart_item(bandage, 2).unwrap();
        engine.finalize_transaction().unwrap();
        engine
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        let engine = busy_engine();

        gateway.save(engine.state()).await?;
        let loaded = gateway.load().await;

        assert_eq!(&loaded, engine.state());
        assert_eq!(loaded.ledger.len(), 5);
        assert_eq!(loaded.log.records()[0].items.len(), 2);
        assert_eq!(loaded.log.records()[0].items[0].name, "Band-Aid");
        Ok(())
    }

    #[tokio::test]
    async fn test_reloaded_store_keeps_selling() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        let mut engine = Engine::new(StoreState::default());
        let id = engine
            .add_product(ProductDraft::new("Skyflakes", Category::Snacks, 6.0, 8.0, 10).unwrap())
            .id;
        engine.start_transaction().unwrap();
        engine.add_to_cart(id).unwrap();
        engine.adjust_cart_item(id, 2).unwrap();
        engine.finalize_transaction().unwrap();
        gateway.save(engine.state()).await?;

        let mut reloaded = Engine::new(gateway.load().await);
        assert_eq!(reloaded.state(), engine.state());
        reloaded.quick_sell(id)?;
        reloaded.quick_sell(id)?;
        gateway.save(reloaded.state()).await?;

        let loaded = gateway.load().await;
        let product = loaded.catalog.find_by_id(id).unwrap();
        assert_eq!(product.stock, 5);
        assert_eq!(product.total_sold, 5);
        assert_eq!(product.stock + product.total_sold, product.initial_stock);
        assert_eq!(loaded.ledger.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        let mut engine = busy_engine();
        gateway.save(engine.state()).await?;

        engine.clear_all();
        gateway.save(engine.state()).await?;

        assert_eq!(gateway.load().await, StoreState::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_large_ledger_is_saved_in_chunks() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        let mut engine = Engine::new(StoreState::default());
        let id = engine
            .add_product(ProductDraft::new("Candy", Category::Candy, 0.5, 1.0, 500).unwrap())
            .id;
        engine.start_transaction().unwrap();
        engine.add_to_cart(id).unwrap();
        engine.adjust_cart_item(id, 349).unwrap();
        engine.finalize_transaction().unwrap();

        gateway.save(engine.state()).await?;
        let loaded = gateway.load().await;
        assert_eq!(loaded.ledger.len(), 350);
        assert_eq!(&loaded, engine.state());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_from_empty_database() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        assert_eq!(gateway.load().await, StoreState::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_catalog_loads_empty_but_keeps_other_collections() -> Result<()> {
        let gateway = DatabaseGateway::new(setup_test_db().await?);
        let engine = busy_engine();
        gateway.save(engine.state()).await?;

        gateway
            .connection()
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "UPDATE products SET stock = -4".to_string(),
            ))
            .await?;

        let loaded = gateway.load().await;
        assert!(loaded.catalog.is_empty());
        assert_eq!(loaded.ledger, engine.state().ledger);
        assert_eq!(loaded.log, engine.state().log);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_tables_load_as_empty() {
        // A database that errors on every query
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let gateway = DatabaseGateway::new(db);
        assert_eq!(gateway.load().await, StoreState::default());
    }
}
