use serde::{Deserialize, Serialize};

use super::{Cents, MonthBucket, Transaction, cents_to_f64, sum_by_type};

/// Income and expense per month, index-aligned with `labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    /// Unique month keys ("2024-02"), parallel to `labels`
    pub keys: Vec<String>,
    pub income: Vec<Cents>,
    pub expense: Vec<Cents>,
}

/// Chart-ready copy of a [`MonthlySeries`] with amounts as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn chart(&self) -> ChartData {
        ChartData {
            labels: self.labels.clone(),
            income: self.income.iter().copied().map(cents_to_f64).collect(),
            expense: self.expense.iter().copied().map(cents_to_f64).collect(),
        }
    }
}

/// Total income and expense for each bucket in `months`.
///
/// Every bucket appears in the output, empty ones as zero. Transactions
/// outside every bucket are ignored; callers are expected to pass only the
/// transactions inside the window.
pub fn build_monthly_series(transactions: &[Transaction], months: &[MonthBucket]) -> MonthlySeries {
    let mut series = MonthlySeries {
        labels: Vec::with_capacity(months.len()),
        keys: Vec::with_capacity(months.len()),
        income: Vec::with_capacity(months.len()),
        expense: Vec::with_capacity(months.len()),
    };

    for bucket in months {
        let totals = sum_by_type(transactions.iter().filter(|t| bucket.contains(t.date)));
        series.labels.push(bucket.label.clone());
        series.keys.push(bucket.key.clone());
        series.income.push(totals.income);
        series.expense.push(totals.expense);
    }

    series
}
