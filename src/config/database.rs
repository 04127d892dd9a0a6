//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is idempotent, so it runs on
//! every startup.

use crate::entities::{Product, Sale, Transaction, TransactionItem};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Default location of the store database, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/store.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database at [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    tracing::debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the products, sales, transactions and transaction items tables if
/// they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Product).await?;
    create_table(db, Sale).await?;
    create_table(db, Transaction).await?;
    create_table(db, TransactionItem).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
