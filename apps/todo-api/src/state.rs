//! Application state shared by request handlers.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap: the MongoDB handles share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Long-lived client, shut down explicitly on exit
    pub mongo_client: Client,
    pub db: Database,
}
