mod memory;
mod repository;

pub use memory::*;
pub use repository::*;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::Transaction;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Read access to recorded transactions.
///
/// Implementations return fully resolved records: a category that no longer
/// exists comes back as `None`, never as an error.
#[allow(async_fn_in_trait)]
pub trait TransactionStore {
    /// Every transaction, newest first.
    async fn fetch_all(&self) -> Result<Vec<Transaction>>;

    /// Transactions with `start <= date <= end`, newest first. Either bound may be open.
    async fn fetch_by_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>>;
}
