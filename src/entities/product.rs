//! Product entity - one row per catalog entry.
//!
//! The id is assigned by the engine (time-derived), so it is not auto-incremented.
//! Category is stored as its key string, e.g. `"firstaid"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Engine-assigned product id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Category key
    pub category: String,
    /// Product name (e.g., "Coke 1.5L")
    pub name: String,
    /// Cost price per unit in PHP
    pub cost_price: f64,
    /// Selling price per unit in PHP
    pub selling_price: f64,
    /// Units on hand
    pub stock: i64,
    /// Units on hand when added
    pub initial_stock: i64,
    /// Units sold since added
    pub total_sold: i64,
    /// When the last unit was sold
    pub last_sold: Option<DateTimeUtc>,
    /// When the product was added
    pub date_added: DateTimeUtc,
}

/// Products are referenced by sales and checkout lines only through denormalized snapshots
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
