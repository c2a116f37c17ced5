use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_cents};

pub type TransactionId = Uuid;
pub type CategoryId = Uuid;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Accepts the stored names plus the short "in"/"out" forms.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(TransactionType::Income),
            "expense" | "out" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Cash In",
            TransactionType::Expense => "Cash Out",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Informational grouping for transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub category_type: TransactionType,
}

impl Category {
    pub fn new(name: impl Into<String>, category_type: TransactionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_type,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.category_type.label())
    }
}

/// A single dated income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub transaction_type: TransactionType,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// Calendar date the money moved
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Person the money is going to or coming from
    pub related_person: Option<String>,
    /// Resolved category; `None` when unset or when the category was deleted
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(transaction_type: TransactionType, amount_cents: Cents, date: NaiveDate) -> Self {
        assert!(amount_cents >= 0, "Transaction amount must not be negative");
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            amount_cents,
            date,
            description: None,
            related_person: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn income(amount_cents: Cents, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount_cents, date)
    }

    pub fn expense(amount_cents: Cents, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount_cents, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_related_person(mut self, person: impl Into<String>) -> Self {
        self.related_person = Some(person.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// True when the attached category was created for the other direction.
    /// The pairing is not enforced anywhere; callers may only report it.
    pub fn has_mismatched_category(&self) -> bool {
        self.category
            .as_ref()
            .is_some_and(|c| c.category_type != self.transaction_type)
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} on {}",
            self.transaction_type.label(),
            format_cents(self.amount_cents),
            self.date.format("%Y-%m-%d")
        )
    }
}
