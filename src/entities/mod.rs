//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities are the storage shapes of the three persisted collections
//! (catalog, sales ledger, transaction log). The engine works with the domain
//! types in [`crate::core::model`]; the persistence gateway converts between them.

pub mod product;
pub mod sale;
pub mod transaction;
pub mod transaction_item;

// Re-export specific types to avoid conflicts
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use transaction_item::{
    Column as TransactionItemColumn, Entity as TransactionItem, Model as TransactionItemModel,
};
