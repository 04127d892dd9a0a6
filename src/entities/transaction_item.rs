//! Transaction item entity - the ordered lines of a checkout.
//!
//! `position` keeps cart order, since rows are not guaranteed to come back in
//! insertion order when loaded through the relation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    /// Row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent checkout
    pub transaction_id: i64,
    /// Position of the line within the checkout
    pub position: i32,
    /// Product sold
    pub product_id: i64,
    /// Product name at time of sale
    pub name: String,
    /// Units sold
    pub qty: i64,
    /// Unit price at time of sale
    pub price: f64,
}

/// Defines relationships between transaction lines and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one checkout
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
