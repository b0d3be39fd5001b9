//! Inventory engine, bulk importer and HTTP handlers

pub mod extract;
pub mod handlers;
pub mod import;
pub mod service;

pub use handlers::AppState;
pub use import::{FileFormat, ImportRow, ImportSummary};
pub use service::InventoryService;
