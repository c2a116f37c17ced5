use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{
    Category, Cents, MAX_AMOUNT_CENTS, Transaction, TransactionId, TransactionType, format_cents,
};
use crate::storage::Repository;

use super::AppError;

/// Record-keeping operations: categories and transactions.
/// Reporting lives in [`ReportingService`](super::ReportingService).
pub struct LedgerService {
    repo: Repository,
}

/// Input for [`LedgerService::record_transaction`].
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub related_person: Option<String>,
    /// Category name or id
    pub category: Option<String>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::init(&database_url(database_path, true)).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::connect(&database_url(database_path, false)).await?;
        Ok(Self::new(repo))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Category operations
    // ========================

    pub async fn create_category(
        &self,
        name: String,
        category_type: TransactionType,
    ) -> Result<Category, AppError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::EmptyCategoryName);
        }
        let existing = self.repo.find_categories_by_name(&name).await?;
        if existing.iter().any(|c| c.category_type == category_type) {
            return Err(AppError::CategoryAlreadyExists(format!(
                "{} ({})",
                name,
                category_type.label()
            )));
        }

        let category = Category::new(name, category_type);
        self.repo.save_category(&category).await?;
        debug!(category = %category, "created category");
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories().await?)
    }

    /// Look up a category by id, falling back to a name match.
    ///
    /// When a name exists for both types, `category_type` picks one; without
    /// it the name is ambiguous. A name that only exists for the other type
    /// still resolves when a type is given.
    pub async fn find_category(
        &self,
        name_or_id: &str,
        category_type: Option<TransactionType>,
    ) -> Result<Category, AppError> {
        if let Ok(id) = Uuid::parse_str(name_or_id) {
            if let Some(category) = self.repo.get_category(id).await? {
                return Ok(category);
            }
        }

        let mut matches = self.repo.find_categories_by_name(name_or_id).await?;
        let index = match category_type {
            Some(wanted) => matches
                .iter()
                .position(|c| c.category_type == wanted)
                .unwrap_or(0),
            None if matches.len() > 1 => {
                return Err(AppError::AmbiguousCategory(name_or_id.to_string()));
            }
            None => 0,
        };

        if index < matches.len() {
            Ok(matches.swap_remove(index))
        } else {
            Err(AppError::CategoryNotFound(name_or_id.to_string()))
        }
    }

    /// Delete a category. Its transactions are kept, uncategorised.
    pub async fn delete_category(
        &self,
        name_or_id: &str,
        category_type: Option<TransactionType>,
    ) -> Result<Category, AppError> {
        let category = self.find_category(name_or_id, category_type).await?;
        if category_type.is_some_and(|t| t != category.category_type) {
            return Err(AppError::CategoryNotFound(format!(
                "{} ({})",
                name_or_id,
                category_type.map(|t| t.label()).unwrap_or_default()
            )));
        }
        self.repo.delete_category(category.id).await?;
        Ok(category)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction.
    ///
    /// A category created for the other direction is accepted and logged.
    pub async fn record_transaction(&self, input: NewTransaction) -> Result<Transaction, AppError> {
        if input.amount_cents < 0 {
            return Err(AppError::InvalidAmount(
                "Amount must not be negative".to_string(),
            ));
        }
        if input.amount_cents > MAX_AMOUNT_CENTS {
            return Err(AppError::InvalidAmount(format!(
                "Amount must not exceed {}",
                format_cents(MAX_AMOUNT_CENTS)
            )));
        }

        let category = match non_blank(input.category) {
            Some(name_or_id) => Some(
                self.find_category(&name_or_id, Some(input.transaction_type))
                    .await?,
            ),
            None => None,
        };

        let mut transaction =
            Transaction::new(input.transaction_type, input.amount_cents, input.date);
        if let Some(description) = non_blank(input.description) {
            transaction = transaction.with_description(description);
        }
        if let Some(person) = non_blank(input.related_person) {
            transaction = transaction.with_related_person(person);
        }
        if let Some(category) = category {
            transaction = transaction.with_category(category);
        }

        if transaction.has_mismatched_category() {
            warn!(
                transaction = %transaction.id,
                transaction_type = %transaction.transaction_type,
                category = ?transaction.category.as_ref().map(|c| c.name.as_str()),
                "category type differs from transaction type"
            );
        }

        self.repo.save_transaction(&transaction).await?;
        debug!(transaction = %transaction, "recorded transaction");
        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.repo
            .get_transaction(id)
            .await?
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// Permanently delete a transaction.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        let transaction = self.get_transaction(id).await?;
        self.repo.delete_transaction(id).await?;
        debug!(transaction = %id, "deleted transaction");
        Ok(transaction)
    }
}

fn database_url(database_path: &str, create: bool) -> String {
    if create {
        format!("sqlite:{}?mode=rwc", database_path)
    } else {
        format!("sqlite:{}", database_path)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
