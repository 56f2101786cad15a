// ── Endpoint outcomes ──
//
// Every dashboard endpoint resolves to an `Outcome`: rows, an explained
// empty result, or a failure classified for the HTTP layer. Nothing above
// the engine ever sees a raw error.

use serde_json::Value;

/// Result of one dashboard endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(Vec<T>),
    Empty(EmptyReason),
    Failed(EndpointError),
}

/// Why an endpoint has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EmptyReason {
    /// Integration disabled, or no base URL configured.
    Unconfigured,
    /// Integration configured but its secrets are not set.
    MissingCredentials,
    /// Upstream call failed on an endpoint that degrades to empty.
    UpstreamFailure,
}

/// A failure the dashboard must surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointError {
    /// Configuration or upstream problem the operator can fix (HTTP 400).
    Client { message: String },
    /// Unexpected failure inside the endpoint (HTTP 500). Carries the last
    /// redacted upstream diagnostic when one was captured.
    Internal {
        message: String,
        diagnostic: Option<Value>,
    },
}

impl EndpointError {
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Client { message } | Self::Internal { message, .. } => message,
        }
    }
}

impl<T> Outcome<T> {
    /// Rows to send: `Ready` rows, or empty for `Empty`; the error on failure.
    pub fn into_rows(self) -> Result<Vec<T>, EndpointError> {
        match self {
            Self::Ready(rows) => Ok(rows),
            Self::Empty(_) => Ok(Vec::new()),
            Self::Failed(err) => Err(err),
        }
    }
}
