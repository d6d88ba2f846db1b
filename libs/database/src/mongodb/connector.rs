use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{MongoConfig, ping};
use crate::common::{DatabaseResult, RetryConfig, retry_with_backoff};

/// Build a MongoDB client from config without touching the network.
///
/// The driver connects lazily, so this succeeds even when the server is
/// unreachable; only a malformed connection string (or a failed SRV lookup
/// for `mongodb+srv://` URIs) is reported here.
///
/// ```ignore
/// let config = MongoConfig::new("mongodb://localhost:27017/todo");
/// let client = database::mongodb::client_from_config(&config).await?;
/// let db = client.database(config.database());
/// ```
pub async fn client_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    let mut options = ClientOptions::parse(&config.url).await?;

    if config.max_pool_size.is_some() {
        options.max_pool_size = config.max_pool_size;
    }
    if config.min_pool_size.is_some() {
        options.min_pool_size = config.min_pool_size;
    }
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(Client::with_options(options)?)
}

/// Verify connectivity in the background and log the outcome.
///
/// Startup is never blocked on the datastore: requests issued before the
/// server becomes reachable fail individually with infrastructure errors.
pub fn spawn_connectivity_probe(client: Client, retry_config: RetryConfig) -> JoinHandle<bool> {
    tokio::spawn(async move {
        match retry_with_backoff(|| ping(&client), retry_config).await {
            Ok(()) => {
                info!("MongoDB connected");
                true
            }
            Err(e) => {
                error!(error = %e, "MongoDB connection could not be established");
                false
            }
        }
    })
}
