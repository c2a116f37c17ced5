use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{
    DashboardSummary, DateFilter, ReportResult, build_dashboard, build_report, parse_filter_date,
};
use crate::storage::TransactionStore;

use super::{AppError, Operation};

/// Read-only reporting over a transaction store.
///
/// Each call fetches one snapshot from the store and computes everything from
/// it; nothing is cached between calls.
pub struct ReportingService<S> {
    store: S,
}

impl<S: TransactionStore> ReportingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Totals over every transaction, the five most recent entries, and the
    /// six-month chart ending at the month containing `today`.
    pub async fn dashboard_summary(&self, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let transactions = self
            .store
            .fetch_all()
            .await
            .map_err(|source| AppError::StoreUnavailable {
                operation: Operation::Dashboard,
                source,
            })?;

        debug!(%today, count = transactions.len(), "building dashboard");
        Ok(build_dashboard(transactions, today))
    }

    /// Ledger and totals for an optional inclusive date range.
    ///
    /// Bounds are `YYYY-MM-DD` strings as received from a form or command
    /// line; blank means unbounded, anything unparseable is rejected.
    pub async fn report(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ReportResult, AppError> {
        let filter = parse_filter(start_date, end_date)?;
        self.report_for(filter).await
    }

    /// Same as [`report`](Self::report) with already-parsed bounds.
    pub async fn report_for(&self, filter: DateFilter) -> Result<ReportResult, AppError> {
        let transactions = self
            .store
            .fetch_by_date_range(filter.start, filter.end)
            .await
            .map_err(|source| AppError::StoreUnavailable {
                operation: Operation::Report,
                source,
            })?;

        debug!(
            start = ?filter.start,
            end = ?filter.end,
            count = transactions.len(),
            "building report"
        );
        Ok(build_report(transactions, filter))
    }
}

fn parse_filter(start_date: Option<&str>, end_date: Option<&str>) -> Result<DateFilter, AppError> {
    let start = parse_filter_date(start_date).map_err(|_| AppError::InvalidFilter {
        field: "start_date",
        value: start_date.unwrap_or_default().to_string(),
    })?;
    let end = parse_filter_date(end_date).map_err(|_| AppError::InvalidFilter {
        field: "end_date",
        value: end_date.unwrap_or_default().to_string(),
    })?;
    Ok(DateFilter::new(start, end))
}
