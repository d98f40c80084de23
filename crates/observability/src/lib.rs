//! Tracing and logging setup shared by the console binary and tests.

/// Initialize process-wide observability with JSON logs.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json);
}

/// Initialize process-wide observability with human-readable logs.
pub fn init_pretty() {
    tracing::init(tracing::LogFormat::Pretty);
}

/// Initialize using `USERDESK_LOG_FORMAT` (`json` or `pretty`, default `json`).
pub fn init_from_env() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;
