//! The inventory engine
//!
//! [`InventoryService`] is stateless apart from the injected store handle.
//! Every call round-trips through the [`SockStore`]; stock changes go through
//! the store's atomic `merge_stock` / `withdraw_stock` so concurrent requests
//! on the same SKU cannot lose updates or oversell.

use std::sync::Arc;

use crate::config::{ImportConfig, ImportMode};
use crate::core::error::{InventoryError, InventoryResult};
use crate::core::query::{Comparison, FilterPlan, SockQuery};
use crate::core::sock::{Sock, SockPayload};
use crate::core::store::{SockStore, StockMerge, Withdrawal};
use crate::inventory::import::{self, FileFormat, ImportRow, ImportSummary};

/// Filter, mutate and import sock stock against a [`SockStore`]
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn SockStore>,
    import: ImportConfig,
}

impl InventoryService {
    pub fn new(store: Arc<dyn SockStore>) -> Self {
        Self {
            store,
            import: ImportConfig::default(),
        }
    }

    /// Choose how bulk imports commit their rows
    pub fn with_import_config(mut self, import: ImportConfig) -> Self {
        self.import = import;
        self
    }

    pub fn store(&self) -> &Arc<dyn SockStore> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every record, in store order
    pub async fn all_socks(&self) -> InventoryResult<Vec<Sock>> {
        self.store
            .find_all()
            .await
            .map_err(|e| InventoryError::unexpected("list all socks", e))
    }

    /// Resolve the filter fields of `query` and apply its sort
    ///
    /// Strict: a query without any filter field is an
    /// [`InventoryError::InvalidFilter`].
    pub async fn filtered_socks(&self, query: &SockQuery) -> InventoryResult<Vec<Sock>> {
        let plan = query.resolve()?;
        let mut socks = self.select(&plan).await?;
        if let Some(sort) = query.sort() {
            sort.apply(&mut socks);
        }
        Ok(socks)
    }

    /// Listing entry point used by the HTTP layer
    ///
    /// A query with no filter field returns the full inventory; the sort
    /// parameters still apply to it.
    pub async fn list_socks(&self, query: &SockQuery) -> InventoryResult<Vec<Sock>> {
        if !query.is_unfiltered() {
            return self.filtered_socks(query).await;
        }

        let mut socks = self.all_socks().await?;
        if let Some(sort) = query.sort() {
            sort.apply(&mut socks);
        }
        Ok(socks)
    }

    async fn select(&self, plan: &FilterPlan) -> InventoryResult<Vec<Sock>> {
        let store = &self.store;
        let result = match plan {
            FilterPlan::Color(color) => store.find_by_color(color).await,
            FilterPlan::Compare {
                color: Some(color),
                comparison,
                value,
            } => match comparison {
                Comparison::GreaterThan => {
                    store
                        .find_by_color_and_cotton_percentage_greater_than(color, *value)
                        .await
                }
                Comparison::LessThan => {
                    store
                        .find_by_color_and_cotton_percentage_less_than(color, *value)
                        .await
                }
                Comparison::EqualTo => {
                    store
                        .find_by_color_and_cotton_percentage(color, *value)
                        .await
                }
            },
            FilterPlan::Compare {
                color: None,
                comparison,
                value,
            } => match comparison {
                Comparison::GreaterThan => {
                    store.find_by_cotton_percentage_greater_than(*value).await
                }
                Comparison::LessThan => store.find_by_cotton_percentage_less_than(*value).await,
                Comparison::EqualTo => store.find_by_cotton_percentage(*value).await,
            },
            FilterPlan::Between { from, to } => {
                store.find_by_cotton_percentage_between(*from, *to).await
            }
        };

        result.map_err(|e| InventoryError::unexpected(format!("query socks {:?}", plan), e))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Register incoming stock, merging into the record for the SKU or
    /// creating it
    pub async fn add_socks(&self, payload: &SockPayload) -> InventoryResult<StockMerge> {
        let key = payload.key();
        let outcome = self
            .store
            .merge_stock(&key, payload.quantity)
            .await
            .map_err(|e| InventoryError::unexpected(format!("add socks {}", key), e))?;

        log_merge(&outcome, payload.quantity);
        Ok(outcome)
    }

    /// Register outgoing stock
    ///
    /// Fails with [`InventoryError::InsufficientStock`] when the SKU is unknown
    /// or holds less than requested; the store is left unchanged in that case.
    pub async fn remove_socks(&self, payload: &SockPayload) -> InventoryResult<Sock> {
        if payload.quantity <= 0 {
            return Err(InventoryError::InvalidQuantity {
                quantity: payload.quantity,
            });
        }

        let key = payload.key();
        let withdrawal = self
            .store
            .withdraw_stock(&key, payload.quantity)
            .await
            .map_err(|e| InventoryError::unexpected(format!("remove socks {}", key), e))?;

        match withdrawal {
            Withdrawal::Applied(sock) => {
                tracing::info!(
                    id = sock.id,
                    color = %sock.color,
                    cotton_percentage = sock.cotton_percentage,
                    removed = payload.quantity,
                    quantity = sock.quantity,
                    "Removed socks from stock"
                );
                Ok(sock)
            }
            Withdrawal::UnknownSku => {
                tracing::warn!(sku = %key, requested = payload.quantity, "No socks to remove");
                Err(InventoryError::insufficient_stock(&key, payload.quantity, None))
            }
            Withdrawal::Insufficient { available } => {
                tracing::warn!(
                    sku = %key,
                    requested = payload.quantity,
                    available,
                    "Not enough socks to remove"
                );
                Err(InventoryError::insufficient_stock(
                    &key,
                    payload.quantity,
                    Some(available),
                ))
            }
        }
    }

    /// Overwrite color, cotton percentage and quantity of the record `id`
    ///
    /// Bypasses the SKU merge key, so it can leave two records sharing a key.
    pub async fn replace_sock(&self, id: i64, payload: &SockPayload) -> InventoryResult<Sock> {
        let mut sock = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| InventoryError::unexpected(format!("find sock {}", id), e))?
            .ok_or(InventoryError::NotFound { id })?;

        sock.apply(payload);
        let sock = self
            .store
            .save(sock)
            .await
            .map_err(|e| InventoryError::unexpected(format!("update sock {}", id), e))?;

        tracing::info!(
            id,
            color = %sock.color,
            cotton_percentage = sock.cotton_percentage,
            quantity = sock.quantity,
            "Replaced sock record"
        );
        Ok(sock)
    }

    // ------------------------------------------------------------------
    // Bulk import
    // ------------------------------------------------------------------

    /// Merge every data row of an uploaded CSV or Excel file
    ///
    /// The format comes from the file name. In [`ImportMode::PerRow`] each
    /// row is merged as soon as it is parsed, so rows before a failing one
    /// stay committed. In [`ImportMode::Atomic`] the file is parsed in full
    /// first and merged as one batch.
    pub async fn import_file(&self, file_name: &str, bytes: &[u8]) -> InventoryResult<ImportSummary> {
        let format = FileFormat::from_file_name(file_name)?;
        let rows = import::read_rows(format, bytes)?;

        let summary = match self.import.mode {
            ImportMode::PerRow => self.import_per_row(format, rows).await,
            ImportMode::Atomic => self.import_atomic(format, rows).await,
        }?;

        tracing::info!(
            file_name,
            rows = summary.rows,
            created = summary.created,
            merged = summary.merged,
            "Imported socks"
        );
        Ok(summary)
    }

    async fn import_per_row(
        &self,
        format: FileFormat,
        rows: import::RowStream<'_>,
    ) -> InventoryResult<ImportSummary> {
        let mut summary = ImportSummary::new(format);

        for row in rows {
            let row = row.inspect_err(|e| {
                tracing::warn!(committed = summary.rows, error = %e, "Import stopped");
            })?;
            let outcome = self.merge_row(&row).await?;
            summary.record(&outcome);
        }

        Ok(summary)
    }

    async fn import_atomic(
        &self,
        format: FileFormat,
        rows: import::RowStream<'_>,
    ) -> InventoryResult<ImportSummary> {
        let rows: Vec<ImportRow> = rows
            .collect::<InventoryResult<_>>()
            .inspect_err(|e| tracing::warn!(error = %e, "Import rejected, nothing committed"))?;

        let batch = rows.iter().map(|row| (row.key(), row.quantity)).collect();
        let outcomes = self
            .store
            .merge_stock_batch(batch)
            .await
            .map_err(|e| InventoryError::unexpected(format!("import {} rows", rows.len()), e))?;

        let mut summary = ImportSummary::new(format);
        for (row, outcome) in rows.iter().zip(&outcomes) {
            log_merge(outcome, row.quantity);
            summary.record(outcome);
        }
        Ok(summary)
    }

    async fn merge_row(&self, row: &ImportRow) -> InventoryResult<StockMerge> {
        let key = row.key();
        let outcome = self
            .store
            .merge_stock(&key, row.quantity)
            .await
            .map_err(|e| {
                InventoryError::unexpected(format!("import row {} ({})", row.row, key), e)
            })?;

        log_merge(&outcome, row.quantity);
        Ok(outcome)
    }
}

fn log_merge(outcome: &StockMerge, added: i32) {
    match outcome {
        StockMerge::Created(sock) => tracing::info!(
            id = sock.id,
            color = %sock.color,
            cotton_percentage = sock.cotton_percentage,
            quantity = sock.quantity,
            "Created sock record"
        ),
        StockMerge::Merged { sock, duplicates } => {
            if *duplicates > 0 {
                tracing::warn!(
                    id = sock.id,
                    sku = %sock.key(),
                    duplicates,
                    "Several records share this SKU; merged into the lowest id"
                );
            }
            tracing::info!(
                id = sock.id,
                color = %sock.color,
                cotton_percentage = sock.cotton_percentage,
                added,
                quantity = sock.quantity,
                "Added socks to stock"
            );
        }
    }
}
