//! JSON backup of the whole store.
//!
//! The bundle is write-only: nothing in the application reads it back.

use crate::{
    core::{
        engine::StoreState,
        model::{Product, SaleRecord, TransactionRecord},
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Snapshot of the three collections plus the export time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle<'a> {
    /// The catalog
    pub inventory: &'a [Product],
    /// The sales ledger
    pub sales_history: &'a [SaleRecord],
    /// The transaction log
    pub transactions: &'a [TransactionRecord],
    /// When the export was made
    pub export_date: DateTime<Utc>,
}

impl<'a> ExportBundle<'a> {
    /// Borrows the collections of `state`.
    #[must_use]
    pub fn new(state: &'a StoreState, export_date: DateTime<Utc>) -> Self {
        Self {
            inventory: state.catalog.products(),
            sales_history: state.ledger.records(),
            transactions: state.log.records(),
            export_date,
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Serialization`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Attachment name for a backup made on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("store_backup_{}.json", date.format("%Y-%m-%d"))
}
