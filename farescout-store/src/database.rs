use async_trait::async_trait;
use farescout_core::repository::HealthCheck;
use farescout_core::{CoreError, CoreResult};
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::info;

use crate::app_config::DatabaseConfig;

/// Process-wide MongoDB handle. The driver pools connections internally,
/// so clones share one pool.
#[derive(Clone)]
pub struct DbClient {
    client: Client,
    database: Database,
}

impl DbClient {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(config.app_name.clone());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(config.connect_timeout());
        options.server_selection_timeout = Some(config.server_selection_timeout());

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);
        info!(
            "MongoDB client ready for database '{}' (pool {}..{})",
            config.name, config.min_pool_size, config.max_pool_size
        );

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Closes pooled connections once outstanding cursors are dropped.
    pub async fn shutdown(self) {
        info!("Shutting down MongoDB client...");
        self.client.shutdown().await;
        info!("MongoDB client closed.");
    }
}

#[async_trait]
impl HealthCheck for DbClient {
    async fn ping(&self) -> CoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

/// Connectivity failures become `StoreUnavailable`, the rest `StoreError`.
pub(crate) fn store_error(err: mongodb::error::Error) -> CoreError {
    match *err.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
            CoreError::StoreUnavailable(err.to_string())
        }
        _ => CoreError::StoreError(err.to_string()),
    }
}
