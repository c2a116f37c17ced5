use thiserror::Error;

/// Which reporting call was running when the store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Dashboard,
    Report,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Dashboard => write!(f, "dashboard"),
            Operation::Report => write!(f, "report"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid {field} filter '{value}': expected YYYY-MM-DD")]
    InvalidFilter { field: &'static str, value: String },

    #[error("Transaction store unavailable while building {operation}: {source}")]
    StoreUnavailable {
        operation: Operation,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category name '{0}' exists for both types; specify the type")]
    AmbiguousCategory(String),

    #[error("Category name must not be empty")]
    EmptyCategoryName,

    #[error("Category already exists: {0}")]
    CategoryAlreadyExists(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
