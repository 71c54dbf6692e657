//! Logging setup for binaries that use this crate.
//!
//! The library itself only emits `tracing` events; it never installs a
//! subscriber. Processes call [`init`] once at start-up, tests install their
//! own subscriber with `tracing::subscriber::with_default`.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`.
/// Later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Like [`init`] but with an explicit filter directive such as
/// `fail_safe_files=debug`.
pub fn init_with_filter(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

fn install(filter: EnvFilter) {
    INIT.get_or_init(|| {
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false));
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // Ignore error if a subscriber is already set (e.g., tests).
        }
    });
}
