//! In-memory implementation of SockStore for testing and development

use crate::core::query::{Comparison, FilterPlan};
use crate::core::sock::{NewSock, SkuKey, Sock};
use crate::core::store::{SockStore, StockMerge, Withdrawal};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
struct Table {
    rows: BTreeMap<i64, Sock>,
    last_id: i64,
}

impl Table {
    fn select(&self, plan: &FilterPlan) -> Vec<Sock> {
        self.rows
            .values()
            .filter(|sock| plan.matches(sock))
            .cloned()
            .collect()
    }

    fn insert(&mut self, sock: NewSock) -> Sock {
        self.last_id += 1;
        let sock = sock.with_id(self.last_id);
        self.rows.insert(sock.id, sock.clone());
        sock
    }

    /// Ids of the records holding `key`, lowest first
    fn ids_for(&self, key: &SkuKey) -> Vec<i64> {
        self.rows
            .values()
            .filter(|sock| key.matches(sock))
            .map(|sock| sock.id)
            .collect()
    }

    fn merge(&mut self, key: &SkuKey, quantity: i32) -> Result<StockMerge> {
        let ids = self.ids_for(key);
        let Some(first) = ids.first().and_then(|id| self.rows.get_mut(id)) else {
            return Ok(StockMerge::Created(
                self.insert(NewSock::new(key.clone(), quantity)),
            ));
        };

        first.quantity = first
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| anyhow!("Quantity overflow for key {}", key))?;
        Ok(StockMerge::Merged {
            sock: first.clone(),
            duplicates: ids.len() - 1,
        })
    }
}

/// In-memory sock store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// every stock mutation runs under a single write lock, which serializes
/// concurrent writers on the same key.
#[derive(Clone, Default)]
pub struct InMemorySockStore {
    table: Arc<RwLock<Table>>,
}

impl InMemorySockStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Table) -> T) -> Result<T> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(f(&*table))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Table) -> T) -> Result<T> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        Ok(f(&mut *table))
    }

    fn select(&self, plan: FilterPlan) -> Result<Vec<Sock>> {
        self.read(|table| table.select(&plan))
    }
}

#[async_trait]
impl SockStore for InMemorySockStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Sock>> {
        self.read(|table| table.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Sock>> {
        self.read(|table| table.rows.values().cloned().collect())
    }

    async fn find_by_color(&self, color: &str) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Color(color.to_string()))
    }

    async fn find_by_color_and_cotton_percentage(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: Some(color.to_string()),
            comparison: Comparison::EqualTo,
            value: cotton_percentage,
        })
    }

    async fn find_by_color_and_cotton_percentage_greater_than(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: Some(color.to_string()),
            comparison: Comparison::GreaterThan,
            value: cotton_percentage,
        })
    }

    async fn find_by_color_and_cotton_percentage_less_than(
        &self,
        color: &str,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: Some(color.to_string()),
            comparison: Comparison::LessThan,
            value: cotton_percentage,
        })
    }

    async fn find_by_cotton_percentage(&self, cotton_percentage: i32) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: None,
            comparison: Comparison::EqualTo,
            value: cotton_percentage,
        })
    }

    async fn find_by_cotton_percentage_greater_than(
        &self,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: None,
            comparison: Comparison::GreaterThan,
            value: cotton_percentage,
        })
    }

    async fn find_by_cotton_percentage_less_than(
        &self,
        cotton_percentage: i32,
    ) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Compare {
            color: None,
            comparison: Comparison::LessThan,
            value: cotton_percentage,
        })
    }

    async fn find_by_cotton_percentage_between(&self, from: i32, to: i32) -> Result<Vec<Sock>> {
        self.select(FilterPlan::Between { from, to })
    }

    async fn insert(&self, sock: NewSock) -> Result<Sock> {
        self.write(|table| table.insert(sock))
    }

    async fn save(&self, sock: Sock) -> Result<Sock> {
        self.write(|table| -> Result<Sock> {
            let slot = table
                .rows
                .get_mut(&sock.id)
                .ok_or_else(|| anyhow!("Sock {} not found", sock.id))?;
            *slot = sock.clone();
            Ok(sock)
        })?
    }

    async fn merge_stock(&self, key: &SkuKey, quantity: i32) -> Result<StockMerge> {
        self.write(|table| table.merge(key, quantity))?
    }

    async fn merge_stock_batch(&self, rows: Vec<(SkuKey, i32)>) -> Result<Vec<StockMerge>> {
        // Staged on a copy so a failing row leaves the table untouched.
        self.write(|table| -> Result<Vec<StockMerge>> {
            let mut staged = table.clone();
            let outcomes = rows
                .iter()
                .map(|(key, quantity)| staged.merge(key, *quantity))
                .collect::<Result<Vec<_>>>()?;
            *table = staged;
            Ok(outcomes)
        })?
    }

    async fn withdraw_stock(&self, key: &SkuKey, quantity: i32) -> Result<Withdrawal> {
        self.write(|table| {
            let ids = table.ids_for(key);
            let Some(sock) = ids.first().and_then(|id| table.rows.get_mut(id)) else {
                return Withdrawal::UnknownSku;
            };

            if sock.quantity < quantity {
                return Withdrawal::Insufficient {
                    available: sock.quantity,
                };
            }

            sock.quantity -= quantity;
            Withdrawal::Applied(sock.clone())
        })
    }
}
