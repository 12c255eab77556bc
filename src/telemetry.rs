//! Tracing bootstrap for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Initializes a fmt subscriber honoring `RUST_LOG`. Later calls are no-ops,
/// so tests and embedding applications can both call it unconditionally.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
