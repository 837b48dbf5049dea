pub mod ai;
pub mod audit;
pub mod config;
pub mod error;

pub use ai::{FunctionAuditor, GatewayAuditor};
pub use audit::{
    classify, AuditBackend, AuditResult, Category, Document, Issue, IssueCatalog, LocalAuditor,
    Severity,
};
pub use error::{AuditError, CatalogError, RetryHint};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Filter comes from RUST_LOG; default is warn for dependencies and info for
/// this crate (one line per audit). Use RUST_LOG=debug for per-document logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,carbon_preaudit=info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
