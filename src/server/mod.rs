//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that wires a store into the
//! inventory service and registers:
//! - the `/api/socks` routes
//! - health check routes
//! - any custom routes supplied by the caller

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::{SERVICE_NAME, build_inventory_routes, health_routes};
