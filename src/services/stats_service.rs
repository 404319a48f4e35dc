//! Visitor statistics service
//!
//! Two operations over the single global counter row:
//! `get_stats` (read, creating the row on first use) and
//! `increment_stats` (atomic `+1` performed by the database).

use std::sync::Arc;

use tracing::debug;

use crate::errors::{CivicError, Result};
use crate::storage::{SeaOrmStorage, VisitorStats};

pub struct StatsService {
    storage: Arc<SeaOrmStorage>,
}

impl StatsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Return the counter row, creating it with `total_visitors = 0` if absent.
    ///
    /// Concurrent first calls all converge on the same row: the insert is
    /// conflict-tolerant on the unique `scope` column and every caller
    /// re-reads afterwards.
    pub async fn get_stats(&self) -> Result<VisitorStats> {
        if let Some(stats) = self.storage.find_visitor_stats().await? {
            return Ok(stats);
        }

        debug!("No visitor stats row yet, creating one");
        self.storage.insert_visitor_stats_if_absent().await?;

        self.storage.find_visitor_stats().await?.ok_or_else(|| {
            CivicError::database_operation("visitor stats row missing after insert")
        })
    }

    /// Increment the counter by exactly one and return the updated row.
    pub async fn increment_stats(&self) -> Result<VisitorStats> {
        let current = self.get_stats().await?;
        self.storage.increment_visitor_stats(&current.id).await
    }
}
