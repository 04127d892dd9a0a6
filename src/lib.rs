//! `SariPos` - A point-of-sale and inventory tracker for small neighborhood stores
//!
//! This crate keeps a product catalog with live stock, sells single items or
//! multi-item carts atomically, records every sale, and reports daily totals and
//! margins. It is operated through a Discord bot and persisted to `SQLite`, with
//! optional AI photo analysis and insights.

#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// `missing_docs` stays a warning: poise command macros generate undocumented items.
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::panic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::too_many_lines,
    clippy::wildcard_imports,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

/// Advisory AI collaborators - photo analysis and store insights
pub mod assist;
/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management for database and store settings
pub mod config;
/// Core business logic - framework-agnostic catalog, selling, persistence and reporting
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
