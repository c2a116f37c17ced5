use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::{MIGRATION_001_INITIAL, TransactionStore};
use crate::domain::{Category, CategoryId, Transaction, TransactionId, TransactionType};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Transactions joined with their category. A dangling `category_id` yields
/// NULL category columns.
const SELECT_TRANSACTIONS: &str = r#"
    SELECT t.id, t.transaction_type, t.amount_cents, t.date, t.description, t.related_person,
           t.created_at, t.updated_at,
           c.id AS category_id, c.name AS category_name, c.category_type AS category_type
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

const ORDER_NEWEST_FIRST: &str = " ORDER BY t.date DESC, t.created_at DESC, t.id DESC";

/// SQLite-backed store for categories and transactions.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Category operations
    // ========================

    pub async fn save_category(&self, category: &Category) -> Result<()> {
        sqlx::query("INSERT INTO categories (id, name, category_type) VALUES (?, ?, ?)")
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(category.category_type.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to save category")?;
        Ok(())
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, category_type FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch category")?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    /// Case-insensitive lookup by name, oldest first. A name may exist once
    /// per type.
    pub async fn find_categories_by_name(&self, name: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, category_type FROM categories WHERE name = ? COLLATE NOCASE ORDER BY rowid",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch categories by name")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, category_type FROM categories ORDER BY name, category_type")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    /// Delete a category and detach it from its transactions.
    pub async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let id_str = id.to_string();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let detached = sqlx::query("UPDATE transactions SET category_id = NULL WHERE category_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to detach category")?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await
            .context("Failed to delete category")?
            .rows_affected();

        tx.commit().await.context("Failed to commit category delete")?;
        debug!(category = %id, detached, "deleted category");
        Ok(deleted > 0)
    }

    fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
        let id_str: String = row.get("id");
        let type_str: String = row.get("category_type");

        Ok(Category {
            id: Uuid::parse_str(&id_str).context("Invalid category ID")?,
            name: row.get("name"),
            category_type: TransactionType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid category type: {}", type_str))?,
        })
    }

    // ========================
    // Transaction operations
    // ========================

    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, transaction_type, amount_cents, date, description, related_person, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.amount_cents)
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(&transaction.description)
        .bind(&transaction.related_person)
        .bind(transaction.category.as_ref().map(|c| c.id.to_string()))
        .bind(transaction.created_at.to_rfc3339())
        .bind(transaction.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;
        Ok(())
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let query = format!("{SELECT_TRANSACTIONS} WHERE t.id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// Permanently delete a transaction. Returns false if it did not exist.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let type_str: String = row.get("transaction_type");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");
        let category_id: Option<String> = row.get("category_id");
        let category_name: Option<String> = row.get("category_name");
        let category_type: Option<String> = row.get("category_type");

        let category = match (category_id, category_name, category_type) {
            (Some(id), Some(name), Some(kind)) => Some(Category {
                id: Uuid::parse_str(&id).context("Invalid category ID")?,
                name,
                category_type: TransactionType::from_str(&kind)
                    .ok_or_else(|| anyhow::anyhow!("Invalid category type: {}", kind))?,
            }),
            _ => None,
        };

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            transaction_type: TransactionType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", type_str))?,
            amount_cents: row.get("amount_cents"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .context("Invalid transaction date")?,
            description: row.get("description"),
            related_person: row.get("related_person"),
            category,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

impl TransactionStore for Repository {
    async fn fetch_all(&self) -> Result<Vec<Transaction>> {
        self.fetch_by_date_range(None, None).await
    }

    async fn fetch_by_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let mut query = format!("{SELECT_TRANSACTIONS} WHERE 1=1");

        // Dates are stored as YYYY-MM-DD text, so string comparison is date order
        let start_str = start.map(|d| d.format(DATE_FORMAT).to_string());
        let end_str = end.map(|d| d.format(DATE_FORMAT).to_string());

        if start_str.is_some() {
            query.push_str(" AND t.date >= ?");
        }
        if end_str.is_some() {
            query.push_str(" AND t.date <= ?");
        }
        query.push_str(ORDER_NEWEST_FIRST);

        let mut sql_query = sqlx::query(&query);
        if let Some(ref s) = start_str {
            sql_query = sql_query.bind(s);
        }
        if let Some(ref e) = end_str {
            sql_query = sql_query.bind(e);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        debug!(?start, ?end, rows = rows.len(), "fetched transactions");
        rows.iter().map(Self::row_to_transaction).collect()
    }
}
