//! Structured observability hooks for facade operations.
//!
//! Events are emitted at `info!` level (filterable via `RUST_LOG`). For JSON
//! output, set `ASPECT_LOG_FORMAT=json`.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the default subscriber for binaries and tests.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env();
    if std::env::var("ASPECT_LOG_FORMAT").as_deref() == Ok("json") {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

/// Emit event: a batched read completed for one entity.
pub fn emit_read(urn: &str, requested: usize, present: usize) {
    info!(event = "aspect.read", urn = %urn, requested = requested, present = present);
}

/// Emit event: a batched read completed across many entities.
pub fn emit_batch_read(entities: usize, keys: usize, present: usize) {
    info!(event = "aspect.batch_read", entities = entities, keys = keys, present = present);
}

/// Emit event: a snapshot was decomposed and written aspect by aspect.
pub fn emit_ingested(urn: &str, aspects: usize) {
    info!(event = "aspect.ingested", urn = %urn, aspects = aspects);
}

/// Emit event: a backfill pass finished for one entity.
pub fn emit_backfilled(urn: &str, requested: usize, materialized: usize) {
    info!(
        event = "aspect.backfilled",
        urn = %urn,
        requested = requested,
        materialized = materialized,
    );
}
