/// Database configuration and connection management
pub mod database;

/// Store settings loading from config.toml
pub mod store;
