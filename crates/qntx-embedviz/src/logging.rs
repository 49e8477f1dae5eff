//! Logging setup for binaries and tests that use this crate.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the caller.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: this crate at `info`, everything else at `warn`.
pub const DEFAULT_FILTER: &str = "warn,qntx_embedviz=info";

/// Install a compact stderr subscriber honouring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Safe to call more than once: returns `false` when a global subscriber was
/// already installed and leaves it in place.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
