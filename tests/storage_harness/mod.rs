//! Shared test harness for storage backend testing
//!
//! Provides helpers for seeding a store and the `store_contract_tests!`
//! macro that every `SockStore` implementation runs.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod store_contract_tests;

use socks::core::sock::{NewSock, SkuKey, Sock};
use socks::core::store::SockStore;

/// Shorthand for a SKU key
pub fn key(color: &str, cotton_percentage: i32) -> SkuKey {
    SkuKey::new(color, cotton_percentage)
}

/// Insert raw records in order, bypassing merge, and return them with ids
pub async fn seed(store: &dyn SockStore, rows: &[(&str, i32, i32)]) -> Vec<Sock> {
    let mut inserted = Vec::with_capacity(rows.len());
    for (color, cotton_percentage, quantity) in rows {
        let sock = store
            .insert(NewSock::new(key(color, *cotton_percentage), *quantity))
            .await
            .unwrap();
        inserted.push(sock);
    }
    inserted
}

/// Cotton percentages of a result, in result order
pub fn percentages(socks: &[Sock]) -> Vec<i32> {
    socks.iter().map(|s| s.cotton_percentage).collect()
}

/// Colors of a result, in result order
pub fn colors(socks: &[Sock]) -> Vec<&str> {
    socks.iter().map(|s| s.color.as_str()).collect()
}
