//! Discord interaction handlers
//!
//! Handlers for non-command Discord interactions. Currently only slash-command
//! autocomplete, backed by the live catalog.

/// Autocomplete handlers for product names and categories
pub mod autocomplete;
