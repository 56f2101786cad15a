use thiserror::Error;

/// Top-level error type for the `aegis-api` crate.
///
/// Only covers failures that prevent a response from being observed at all.
/// Non-2xx responses are NOT errors here: they come back as a
/// [`Fetched`](crate::Fetched) so the caller can decide between fallback,
/// empty result, and hard failure.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// A credential or gateway header could not be encoded as a header value.
    #[error("Invalid credential header: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
