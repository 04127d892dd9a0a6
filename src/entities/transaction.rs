//! Transaction entity - one row per finalized checkout.
//!
//! The ordered lines live in `transaction_items`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Engine-assigned checkout id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// When the checkout completed
    pub timestamp: DateTimeUtc,
    /// Revenue across all lines
    pub total_revenue: f64,
    /// Profit across all lines
    pub total_profit: f64,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A checkout has many lines
    #[sea_orm(has_many = "super::transaction_item::Entity")]
    Items,
}

impl Related<super::transaction_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
