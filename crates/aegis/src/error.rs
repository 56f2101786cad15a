//! CLI error types with miette diagnostics.
//!
//! Maps configuration and core errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aegis_config::ConfigError;
use aegis_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const UPSTREAM: i32 = 4;
    pub const BIND: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(aegis::config),
        help(
            "Check the deployment config file (run: aegis config path)\n\
             and any AEGIS_* environment variables."
        )
    )]
    Config(#[from] ConfigError),

    #[error("Could not set up the HTTP client: {reason}")]
    #[diagnostic(
        code(aegis::transport),
        help("Check ca_cert in the deployment config, or set insecure = true for testing.")
    )]
    Transport { reason: String },

    // ── Server ───────────────────────────────────────────────────────

    #[error("Could not listen on {addr}")]
    #[diagnostic(
        code(aegis::bind_failed),
        help(
            "Is another process using {addr}?\n\
             Pick another address with --listen or AEGIS_LISTEN."
        )
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── Upstream ─────────────────────────────────────────────────────

    #[error("{endpoint} failed: {message}")]
    #[diagnostic(
        code(aegis::endpoint_failed),
        help("Run with -v to see upstream requests, or check the integration settings file.")
    )]
    Endpoint { endpoint: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(aegis::internal))]
    Internal { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(aegis::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render config: {0}")]
    #[diagnostic(code(aegis::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Transport { .. } => exit_code::CONFIG,
            Self::Bind { .. } => exit_code::BIND,
            Self::Endpoint { .. } => exit_code::UPSTREAM,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Client(e) => Self::Transport {
                reason: e.to_string(),
            },
            store @ CoreError::Store(_) => Self::Internal {
                message: store.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use aegis_core::{StoreError, TransportError};

    use super::*;

    #[test]
    fn client_setup_failure_is_config_error() {
        let err = CliError::from(CoreError::Client(TransportError::Tls("bad PEM".into())));
        assert!(matches!(err, CliError::Transport { .. }));
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn store_failure_is_general_error() {
        let err = CliError::from(CoreError::Store(StoreError::Unavailable("offline".into())));
        assert!(matches!(err, CliError::Internal { ref message } if message.contains("offline")));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
