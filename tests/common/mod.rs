// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use cashbook::application::{LedgerService, NewTransaction, ReportingService};
use cashbook::domain::{Cents, Transaction, TransactionType};
use cashbook::storage::{Repository, TransactionStore};
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to create a ledger service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Reporting over the same database as `service`
pub fn reporting_for(service: &LedgerService) -> ReportingService<Repository> {
    ReportingService::new(service.repository().clone())
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Input for a plain uncategorised transaction
pub fn new_transaction(
    transaction_type: TransactionType,
    amount_cents: Cents,
    date: &str,
) -> NewTransaction {
    NewTransaction {
        transaction_type,
        amount_cents,
        date: parse_date(date),
        description: None,
        related_person: None,
        category: None,
    }
}

/// Income 100.00 on 2024-01-15, expense 40.00 on 2024-01-20, income 50.00 on 2024-03-01
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        Transaction::income(10000, parse_date("2024-01-15")).with_description("Salary"),
        Transaction::expense(4000, parse_date("2024-01-20")).with_description("Groceries"),
        Transaction::income(5000, parse_date("2024-03-01")).with_description("Refund"),
    ]
}

/// A store whose backend is always down
pub struct UnreachableStore;

impl TransactionStore for UnreachableStore {
    async fn fetch_all(&self) -> Result<Vec<Transaction>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn fetch_by_date_range(
        &self,
        _start: Option<NaiveDate>,
        _end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        Err(anyhow::anyhow!("connection refused"))
    }
}
