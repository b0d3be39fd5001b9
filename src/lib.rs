//! # Socks Inventory
//!
//! A stock ledger for socks, keyed by color and cotton percentage, served
//! over a small REST API.
//!
//! ## Features
//!
//! - **Filter Resolution**: color, comparison and range filters resolved in a fixed order
//! - **Stable Sorting**: by color or cotton percentage, ascending or descending
//! - **Merge-or-Create Income**: incoming stock merges into the record for its SKU
//! - **Guarded Outcome**: decrements never drive a quantity below zero, even under concurrency
//! - **Bulk Import**: CSV and Excel uploads, per-row or all-or-nothing
//! - **Pluggable Storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use socks::prelude::*;
//!
//! let service = InventoryService::new(Arc::new(InMemorySockStore::new()));
//!
//! service.add_socks(&SockPayload::new("red", 80, 10)).await?;
//! service.remove_socks(&SockPayload::new("red", 80, 3)).await?;
//!
//! let query = SockQuery {
//!     color: Some("red".into()),
//!     ..Default::default()
//! };
//! let socks = service.list_socks(&query).await?;
//! assert_eq!(socks[0].quantity, 7);
//! ```

pub mod config;
pub mod core;
pub mod inventory;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{InventoryError, InventoryResult},
        query::{Comparison, FilterPlan, SockQuery, SortDirection, SortField, SortSpec},
        sock::{NewSock, SkuKey, Sock, SockPayload},
        store::{SockStore, StockMerge, Withdrawal},
    };

    // === Engine ===
    pub use crate::inventory::{
        FileFormat, ImportSummary, InventoryService, handlers::AppState,
    };

    // === Storage ===
    pub use crate::storage::InMemorySockStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresSockStore;

    // === Config ===
    pub use crate::config::{AppConfig, ImportConfig, ImportMode, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
