// Instrumented request execution
//
// Every upstream call goes through `execute`: it sends the request, records
// a redacted audit diagnostic (request line + headers, full response), logs
// it on the `aegis_api::audit` target, and attempts a JSON parse. A body
// that isn't JSON is not an error at this layer; `Fetched::body` is simply
// `None` and the caller decides what that means.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::Error;

/// Replacement for secret header values in diagnostics.
pub const REDACTED: &str = "[REDACTED]";

/// Request headers whose values never appear in a diagnostic.
const SECRET_HEADERS: &[&str] = &["authorization", "cf-access-client-secret", "x-tunnel-code"];

// ── Diagnostic ──────────────────────────────────────────────────────

/// Audit record of one upstream exchange, safe to log or return to a client.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub endpoint: String,
    pub request: RequestRecord,
    pub response: ResponseRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Diagnostic {
    /// Render as a JSON value (for error payloads).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn header_map(headers: &HeaderMap, redact: bool) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let key = name.as_str().to_owned();
            let shown = if redact && SECRET_HEADERS.contains(&name.as_str()) {
                REDACTED.to_owned()
            } else {
                value.to_str().unwrap_or("<binary>").to_owned()
            };
            (key, shown)
        })
        .collect()
}

// ── Fetched ─────────────────────────────────────────────────────────

/// A completed upstream exchange: status, headers, raw body, and the parsed
/// JSON body when the payload was valid JSON.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: String,
    pub body: Option<serde_json::Value>,
    pub diagnostic: Diagnostic,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Canonical reason phrase for the status (e.g. `"Bad Request"`).
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown Status")
    }

    /// Decode the parsed body into a typed envelope.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let Some(body) = &self.body else {
            return Err(Error::Deserialization {
                message: "response body is not valid JSON".into(),
                body: self.raw.clone(),
            });
        };
        serde_json::from_value(body.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.raw.clone(),
        })
    }
}

// ── Execution ───────────────────────────────────────────────────────

/// Send a prepared request and capture the exchange.
///
/// `endpoint` is a short label (e.g. `"ActiveOutages"`) identifying the
/// dashboard operation in the audit log.
pub async fn execute(
    http: &reqwest::Client,
    endpoint: &str,
    request: reqwest::Request,
) -> Result<Fetched, Error> {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let request_headers = header_map(request.headers(), true);
    debug!(endpoint, %method, %url, "sending upstream request");

    let resp = http.execute(request).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let raw = resp.text().await?;

    let diagnostic = Diagnostic {
        endpoint: endpoint.to_owned(),
        request: RequestRecord {
            method,
            url,
            headers: request_headers,
        },
        response: ResponseRecord {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            headers: header_map(&headers, false),
            body: raw.clone(),
        },
    };

    info!(
        target: "aegis_api::audit",
        endpoint,
        status = status.as_u16(),
        diagnostic = %serde_json::to_string(&diagnostic).unwrap_or_default(),
        "upstream call"
    );

    let body = serde_json::from_str(&raw).ok();
    if body.is_none() && !raw.is_empty() {
        debug!(endpoint, "response body is not JSON");
    }

    Ok(Fetched {
        status,
        headers,
        raw,
        body,
        diagnostic,
    })
}
