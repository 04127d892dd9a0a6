//! Sales ledger and transaction log - append-only histories.
//!
//! Records are never edited or removed individually; the only way to shrink
//! either log is a full store clear.

use crate::core::model::{SaleRecord, TransactionId, TransactionRecord};
use serde::{Deserialize, Serialize};

/// Per-unit sale history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesLedger {
    records: Vec<SaleRecord>,
}

impl SalesLedger {
    /// Wraps records loaded from storage, oldest first.
    #[must_use]
    pub const fn from_records(records: Vec<SaleRecord>) -> Self {
        Self { records }
    }

    /// All sale records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    /// Number of units recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been sold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> &[SaleRecord] {
        &self.records[self.records.len().saturating_sub(count)..]
    }

    /// Records belonging to one checkout.
    pub fn for_transaction(&self, id: TransactionId) -> impl Iterator<Item = &SaleRecord> {
        self.records
            .iter()
            .filter(move |s| s.transaction_id == Some(id))
    }

    pub(crate) fn append(&mut self, record: SaleRecord) {
        self.records.push(record);
    }

    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = SaleRecord>) {
        self.records.extend(records);
    }
}

/// Per-checkout history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    /// Wraps records loaded from storage, oldest first.
    #[must_use]
    pub const fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// All checkouts, oldest first.
    #[must_use]
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Number of checkouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no checkout has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest checkout id, if any.
    pub(crate) fn max_id(&self) -> Option<TransactionId> {
        self.records.iter().map(|t| t.id).max()
    }

    pub(crate) fn append(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }
}
