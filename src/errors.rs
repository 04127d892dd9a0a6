//! Unified error type for the point-of-sale system.
//!
//! Engine rejections (validation, stock, state-machine misuse) are ordinary
//! values the front end reports back to the user; infrastructure failures
//! (database, configuration, Discord framework) propagate to the framework's
//! error handler.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Add-product input was rejected before any mutation.
    #[error("Invalid product input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A sale, cart change or checkout asked for more units than are in stock.
    #[error("Not enough stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        /// Product name
        product: String,
        /// Units currently in stock
        available: u32,
        /// Units the operation needed
        requested: u32,
    },

    /// No product with the given id (or name) exists in the catalog.
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Id or name used for the lookup
        name: String,
    },

    /// A quantity adjustment referenced a product that has no cart line.
    #[error("{product} is not in the current sale")]
    NotInCart {
        /// Product name
        product: String,
    },

    /// A cart operation was attempted while no transaction is open.
    #[error("No sale is in progress")]
    NoOpenTransaction,

    /// A quick-sell was attempted while a cart is open.
    #[error("A sale is in progress; add items to the cart instead")]
    TransactionInProgress,

    /// A new transaction was started while one is already open.
    #[error("A sale is already in progress")]
    TransactionAlreadyOpen,

    /// Finalize was called on a cart with no lines.
    #[error("The cart is empty")]
    EmptyCart,

    /// An AI collaborator was unreachable or returned something unusable.
    #[error("External service error: {message}")]
    ExternalService {
        /// Description of the failure
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the failure
        message: String,
    },

    /// Database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A stored integer did not fit the domain type.
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework failure.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Returns true for rejections that should be shown to the user as a
    /// normal reply rather than treated as a fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InsufficientStock { .. }
                | Self::ProductNotFound { .. }
                | Self::NotInCart { .. }
                | Self::NoOpenTransaction
                | Self::TransactionInProgress
                | Self::TransactionAlreadyOpen
                | Self::EmptyCart
                | Self::ExternalService { .. }
        )
    }

    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::ExternalService`] with the given message.
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService {
            message: message.into(),
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
