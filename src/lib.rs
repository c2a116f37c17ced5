pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

use std::sync::Once;

pub use domain::*;
pub use storage::{MemoryStore, Repository, TransactionStore};

static INIT_TRACING: Once = Once::new();

/// Install the global stderr subscriber. `RUST_LOG` directives take
/// precedence over the default level picked by `verbose`.
pub fn init_tracing(verbose: bool) {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let default = if verbose { "cashbook=debug" } else { "cashbook=warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
