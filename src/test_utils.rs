//! Shared test utilities.
//!
//! This module provides common helpers for setting up test databases, an
//! in-memory persistence gateway, and product drafts with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        engine::StoreState,
        model::{Category, ProductDraft},
        persistence::PersistenceGateway,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Gateway that keeps the last saved state in memory.
///
/// Saves can be made to fail on demand to exercise the dirty-shop path.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<StoreState>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryGateway {
    /// A gateway whose storage already holds `state`.
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// The last successfully saved state.
    pub async fn saved(&self) -> StoreState {
        self.state.lock().await.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every following save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load(&self) -> StoreState {
        self.saved().await
    }

    async fn save(&self, state: &StoreState) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        *self.state.lock().await = state.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Creates a valid draft in the `Snacks` category.
///
/// # Panics
/// Panics if the values fail validation; tests pass valid ones.
pub fn sample_draft(name: &str, cost_price: f64, selling_price: f64, stock: i64) -> ProductDraft {
    ProductDraft::new(name, Category::Snacks, cost_price, selling_price, stock).unwrap()
}
