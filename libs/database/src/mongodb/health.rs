use mongodb::{Client, bson::doc};

use crate::common::{DatabaseError, DatabaseResult};

/// Round-trip a `ping` command against the `admin` database.
///
/// ```ignore
/// let client = database::mongodb::client_from_config(&config).await?;
/// database::mongodb::ping(&client).await?;
/// ```
pub async fn ping(client: &Client) -> DatabaseResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    Ok(())
}
