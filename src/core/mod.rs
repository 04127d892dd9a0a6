//! Core business logic - framework-agnostic catalog, selling and reporting.
//!
//! Nothing in here knows about Discord. The [`engine::Engine`] is synchronous
//! and storage-free; [`shop::Shop`] pairs it with a
//! [`persistence::PersistenceGateway`].

/// Shopping cart for a multi-item sale
pub mod cart;
/// Product catalog and stock bookkeeping
pub mod catalog;
/// Selling state machine
pub mod engine;
/// JSON backup bundle
pub mod export;
/// Append-only sales ledger and transaction log
pub mod ledger;
/// Domain types shared by every layer
pub mod model;
/// Storage trait and its `SQLite` implementation
pub mod persistence;
/// Daily statistics, dashboard KPIs and margins
pub mod report;
/// Engine plus persistence, as used by the front end
pub mod shop;
