use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call has any effect, and a
/// subscriber installed elsewhere is left alone.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    });
}
