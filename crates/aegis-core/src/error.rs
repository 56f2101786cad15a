// ── Core error types ──
//
// Errors from aegis-core. Dashboard endpoints never return these directly:
// they are folded into an `Outcome` at the endpoint boundary. They surface
// from the helpers that callers may use on their own (store access, client
// construction).

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration store error: {0}")]
    Store(#[from] StoreError),

    // ── Client setup ─────────────────────────────────────────────────
    /// The shared HTTP client could not be built (bad CA bundle, TLS
    /// backend failure).
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] aegis_api::Error),
}
