//! Tracing/logging setup shared by the ledger binaries and tests.

/// Initialize process-wide logging from `RUST_LOG` (default `info`), JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize process-wide logging from an explicit configuration.
pub fn init_with(config: &LogConfig) {
    tracing::init_with(config);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogConfig;
