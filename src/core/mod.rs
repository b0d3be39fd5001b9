//! Core module containing the inventory record, the store trait, query
//! resolution and the error type

pub mod error;
pub mod query;
pub mod sock;
pub mod store;

pub use error::{ErrorResponse, InventoryError, InventoryResult};
pub use query::{Comparison, FilterPlan, SockQuery, SortDirection, SortField, SortSpec};
pub use sock::{NewSock, SkuKey, Sock, SockPayload};
pub use store::{SockStore, StockMerge, Withdrawal};
