//! Tracing setup for embedders and binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` for this crate. Safe to call
/// once per process; embedders that install their own subscriber
/// should skip this.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("maestro_core=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
