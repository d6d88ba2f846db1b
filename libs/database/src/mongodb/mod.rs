//! MongoDB connector and utilities
//!
//! Provides lazy client construction, connectivity checks and config loading.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, DEFAULT_URL, MongoConfig};
pub use connector::{client_from_config, spawn_connectivity_probe};
pub use health::ping;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
