//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemorySockStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresSockStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::store::SockStore;
use anyhow::Result;
use std::sync::Arc;

/// Open the store selected by `config.backend`
///
/// The PostgreSQL backend needs `database_url` and the `postgres` feature;
/// its schema is created on first connect.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn SockStore>> {
    match config.backend {
        StorageBackend::InMemory => {
            tracing::info!("Using in-memory sock store");
            Ok(Arc::new(InMemorySockStore::new()))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url (or DATABASE_URL) is required for postgres")
            })?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

            tracing::info!(max_connections = config.max_connections, "Using PostgreSQL sock store");
            Ok(Arc::new(PostgresSockStore::connect(pool).await?))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => Err(anyhow::anyhow!(
            "storage backend 'postgres' requires the `postgres` feature"
        )),
    }
}
