mod aggregate;
mod ledger;
mod money;
mod month;
mod series;
mod transaction;

pub use aggregate::*;
pub use ledger::*;
pub use money::*;
pub use month::*;
pub use series::*;
pub use transaction::*;
