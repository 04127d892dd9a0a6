//! Sale entity - one row per unit sold.
//!
//! Rows are inserted in ledger order, so the auto-incremented `id` preserves
//! that order on load.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Ledger position
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent checkout, `None` for quick-sells
    pub transaction_id: Option<i64>,
    /// Product sold
    pub product_id: i64,
    /// Product name at time of sale
    pub product_name: String,
    /// Selling price at time of sale
    pub selling_price: f64,
    /// Cost price at time of sale
    pub cost_price: f64,
    /// Profit on this unit
    pub profit: f64,
    /// When the unit was sold
    pub timestamp: DateTimeUtc,
}

/// Sales are snapshots and keep no foreign keys
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
