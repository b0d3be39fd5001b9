//! Record store trait for sock inventory
//!
//! The engine never touches persisted state directly; it goes through a
//! [`SockStore`]. Implementations own the table, hand out ids, and provide
//! the atomic stock operations that keep concurrent writers from losing
//! updates or driving a quantity below zero.

use anyhow::Result;
use async_trait::async_trait;

use crate::core::sock::{NewSock, SkuKey, Sock};

/// What a merge-or-create did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockMerge {
    /// No record had the key; this one was inserted
    Created(Sock),
    /// The quantity of an existing record was increased
    ///
    /// `duplicates` counts the other records sharing the key, which were left
    /// untouched. It is non-zero only after replace-by-id has produced a
    /// duplicate key.
    Merged { sock: Sock, duplicates: usize },
}

impl StockMerge {
    pub fn sock(&self) -> &Sock {
        match self {
            StockMerge::Created(sock) => sock,
            StockMerge::Merged { sock, .. } => sock,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, StockMerge::Created(_))
    }
}

/// What a guarded decrement did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Withdrawal {
    /// The quantity was decreased; the updated record is returned
    Applied(Sock),
    /// No record has the key
    UnknownSku,
    /// The record holds fewer than requested; nothing was changed
    Insufficient { available: i32 },
}

/// Store trait for sock records
///
/// Every lookup returns records in ascending id order. Color matches are
/// exact and case-sensitive.
///
/// The `merge_*` and `withdraw_stock` operations must each be atomic with
/// respect to other calls on the same key: the read, the check, and the write
/// happen as one step. When several records share a key, the one with the
/// lowest id is the one that gets mutated.
#[async_trait]
pub trait SockStore: Send + Sync {
    /// Get a record by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Sock>>;

    /// List every record
    async fn find_all(&self) -> Result<Vec<Sock>>;

    async fn find_by_color(&self, color: &str) -> Result<Vec<Sock>>;

    /// Exact SKU key lookup
    async fn find_by_color_and_cotton_percentage(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>>;

    async fn find_by_color_and_cotton_percentage_greater_than(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>>;

    async fn find_by_color_and_cotton_percentage_less_than(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>>;

    async fn find_by_cotton_percentage(&self, cotton_percentage: i32) -> Result<Vec<Sock>>;

    async fn find_by_cotton_percentage_greater_than(
        &self,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>>;

    async fn find_by_cotton_percentage_less_than(&self, cotton_percentage: i32)
    -> Result<Vec<Sock>>;

    /// Inclusive range lookup
    async fn find_by_cotton_percentage_between(&self, from: i32, to: i32) -> Result<Vec<Sock>>;

    /// Insert a new record and return it with its assigned id
    async fn insert(&self, sock: NewSock) -> Result<Sock>;

    /// Overwrite an existing record, located by its id
    ///
    /// Fails if the id is unknown.
    async fn save(&self, sock: Sock) -> Result<Sock>;

    /// Add `quantity` to the record holding `key`, or create it
    async fn merge_stock(&self, key: &SkuKey, quantity: i32) -> Result<StockMerge>;

    /// Merge many rows as one unit
    ///
    /// Either every row is applied or none is. Rows are applied in order, so
    /// a key appearing twice is created by the first row and merged by the
    /// second.
    async fn merge_stock_batch(&self, rows: Vec<(SkuKey, i32)>) -> Result<Vec<StockMerge>>;

    /// Subtract `quantity` from the record holding `key` if it holds enough
    async fn withdraw_stock(&self, key: &SkuKey, quantity: i32) -> Result<Withdrawal>;
}
