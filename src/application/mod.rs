// Application layer - use cases over the storage layer.
// Reporting is read-only and generic over any `TransactionStore`;
// record keeping goes straight to the SQLite repository.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
