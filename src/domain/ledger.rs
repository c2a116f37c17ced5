use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    Cents, DEFAULT_MONTH_COUNT, MonthlySeries, Transaction, build_monthly_series, build_months,
    sum_by_type, window_bounds,
};

/// Number of transactions shown on the dashboard.
pub const RECENT_LIMIT: usize = 5;

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Parse an optional `YYYY-MM-DD` filter bound. Blank input means no bound.
pub fn parse_filter_date(input: Option<&str>) -> Result<Option<NaiveDate>, chrono::ParseError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Some),
    }
}

/// Order by date, newest first. Same-day entries put the latest recorded first.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| (Reverse(t.date), Reverse(t.created_at), Reverse(t.id)));
}

/// A filtered ledger with its totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResult {
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub total_in: Cents,
    pub total_out: Cents,
    pub balance: Cents,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Running totals, recent activity and the monthly chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// At most [`RECENT_LIMIT`] entries, newest first
    pub recent_transactions: Vec<Transaction>,
    pub total_in: Cents,
    pub total_out: Cents,
    pub balance: Cents,
    pub monthly_series: MonthlySeries,
}

/// Filter a snapshot by `filter` and total what remains.
///
/// A start bound after the end bound simply matches nothing.
pub fn build_report(transactions: Vec<Transaction>, filter: DateFilter) -> ReportResult {
    let mut transactions: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| filter.matches(t.date))
        .collect();
    sort_newest_first(&mut transactions);

    let totals = sum_by_type(&transactions);

    ReportResult {
        transactions,
        total_in: totals.income,
        total_out: totals.expense,
        balance: totals.balance(),
        start_date: filter.start,
        end_date: filter.end,
    }
}

/// Summarise every transaction in a snapshot as of `today`.
///
/// Totals cover the whole snapshot; only the displayed list is truncated.
pub fn build_dashboard(transactions: Vec<Transaction>, today: NaiveDate) -> DashboardSummary {
    let months = build_months(today, DEFAULT_MONTH_COUNT);
    let in_window: Vec<Transaction> = match window_bounds(&months) {
        Some((start, end)) => transactions
            .iter()
            .filter(|t| start <= t.date && t.date < end)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    let monthly_series = build_monthly_series(&in_window, &months);

    let report = build_report(transactions, DateFilter::default());
    let mut recent_transactions = report.transactions;
    recent_transactions.truncate(RECENT_LIMIT);

    DashboardSummary {
        recent_transactions,
        total_in: report.total_in,
        total_out: report.total_out,
        balance: report.balance,
        monthly_series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::income(10000, date(2024, 1, 15)),
            Transaction::expense(4000, date(2024, 1, 20)),
            Transaction::income(5000, date(2024, 3, 1)),
        ]
    }

    fn dates(transactions: &[Transaction]) -> Vec<NaiveDate> {
        transactions.iter().map(|t| t.date).collect()
    }

    #[test]
    fn test_unfiltered_report() {
        let report = build_report(sample(), DateFilter::default());

        assert_eq!(report.total_in, 15000);
        assert_eq!(report.total_out, 4000);
        assert_eq!(report.balance, 11000);
        assert_eq!(
            dates(&report.transactions),
            [date(2024, 3, 1), date(2024, 1, 20), date(2024, 1, 15)]
        );
    }

    #[test]
    fn test_start_bound_only() {
        let report = build_report(sample(), DateFilter::new(Some(date(2024, 2, 1)), None));

        assert_eq!(dates(&report.transactions), [date(2024, 3, 1)]);
        assert_eq!(report.total_in, 5000);
        assert_eq!(report.total_out, 0);
        assert_eq!(report.start_date, Some(date(2024, 2, 1)));
        assert_eq!(report.end_date, None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = DateFilter::new(Some(date(2024, 1, 15)), Some(date(2024, 1, 20)));
        let report = build_report(sample(), filter);

        assert_eq!(report.transactions.len(), 2);
        assert_eq!(report.balance, 6000);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let filter = DateFilter::new(Some(date(2024, 3, 1)), Some(date(2024, 1, 1)));
        let report = build_report(sample(), filter);

        assert!(report.transactions.is_empty());
        assert_eq!((report.total_in, report.total_out, report.balance), (0, 0, 0));
    }

    #[test]
    fn test_parse_filter_date() {
        assert_eq!(parse_filter_date(None), Ok(None));
        assert_eq!(parse_filter_date(Some("  ")), Ok(None));
        assert_eq!(parse_filter_date(Some("2024-02-01")), Ok(Some(date(2024, 2, 1))));
        assert!(parse_filter_date(Some("2024-13-01")).is_err());
        assert!(parse_filter_date(Some("yesterday")).is_err());
    }

    #[test]
    fn test_same_day_sorts_latest_recorded_first() {
        let first = Transaction::income(100, date(2024, 5, 5));
        let mut second = Transaction::expense(200, date(2024, 5, 5));
        second.created_at = first.created_at + chrono::Duration::seconds(1);

        let mut transactions = vec![first.clone(), second.clone()];
        sort_newest_first(&mut transactions);

        assert_eq!(transactions[0].id, second.id);
        assert_eq!(transactions[1].id, first.id);
    }

    #[test]
    fn test_dashboard_truncates_list_but_not_totals() {
        let transactions: Vec<_> = (1..=8)
            .map(|day| Transaction::income(1000, date(2024, 6, day)))
            .chain([Transaction::expense(2500, date(2023, 1, 1))])
            .collect();

        let summary = build_dashboard(transactions, date(2024, 6, 30));

        assert_eq!(summary.recent_transactions.len(), RECENT_LIMIT);
        assert_eq!(summary.recent_transactions[0].date, date(2024, 6, 8));
        assert_eq!(summary.total_in, 8000);
        assert_eq!(summary.total_out, 2500);
        assert_eq!(summary.balance, 5500);
        // The 2023 expense is outside the chart window
        assert_eq!(summary.monthly_series.expense, vec![0; 6]);
        assert_eq!(summary.monthly_series.income, vec![0, 0, 0, 0, 0, 8000]);
    }

    #[test]
    fn test_dashboard_with_no_transactions() {
        let summary = build_dashboard(Vec::new(), date(2024, 2, 1));

        assert!(summary.recent_transactions.is_empty());
        assert_eq!(summary.balance, 0);
        assert_eq!(summary.monthly_series.len(), 6);
        assert_eq!(summary.monthly_series.labels.last().map(String::as_str), Some("Feb"));
    }
}
