use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use chrono::NaiveDate;

use super::TransactionStore;
use crate::domain::{DateFilter, Transaction, TransactionId, sort_newest_first};

/// In-memory transaction store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: RwLock::new(transactions),
        }
    }

    pub fn insert(&self, transaction: Transaction) {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transaction);
    }

    /// Remove a transaction, returning it if it was present.
    pub fn remove(&self, id: TransactionId) -> Option<Transaction> {
        let mut transactions = self
            .transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let index = transactions.iter().position(|t| t.id == id)?;
        Some(transactions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TransactionStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.snapshot();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    async fn fetch_by_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let filter = DateFilter::new(start, end);
        let mut transactions: Vec<Transaction> = self
            .snapshot()
            .into_iter()
            .filter(|t| filter.matches(t.date))
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }
}
