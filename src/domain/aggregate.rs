use serde::{Deserialize, Serialize};

use super::{Cents, Transaction, TransactionType};

/// Sum of amounts per transaction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Cents,
    pub expense: Cents,
}

impl Totals {
    /// Income minus expense.
    pub fn balance(&self) -> Cents {
        self.income.saturating_sub(self.expense)
    }

    pub fn add(&mut self, transaction: &Transaction) {
        match transaction.transaction_type {
            TransactionType::Income => {
                self.income = self.income.saturating_add(transaction.amount_cents)
            }
            TransactionType::Expense => {
                self.expense = self.expense.saturating_add(transaction.amount_cents)
            }
        }
    }
}

/// Sum amounts by type over an already-filtered set of transactions.
/// A type with no transactions totals zero.
pub fn sum_by_type<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(Totals::default(), |mut totals, transaction| {
            totals.add(transaction);
            totals
        })
}
