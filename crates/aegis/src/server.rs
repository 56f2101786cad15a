//! Dashboard HTTP API.
//!
//! One `GET` route per dashboard panel, each mapping the endpoint's
//! [`Outcome`] onto the JSON envelope `{ success, data, error, details }`:
//! rows or an empty result are 200, client errors 400, internal errors 500.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use aegis_core::{ClientConfig, Dashboard, EndpointError, Outcome};

// ── Envelope ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    fn failure(error: String, details: Option<Value>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            details,
        }
    }
}

/// Envelope and status for an endpoint outcome.
pub fn envelope<T>(outcome: Outcome<T>) -> (StatusCode, Envelope<Vec<T>>) {
    match outcome.into_rows() {
        Ok(rows) => (StatusCode::OK, Envelope::ok(rows)),
        Err(EndpointError::Client { message }) => {
            (StatusCode::BAD_REQUEST, Envelope::failure(message, None))
        }
        Err(EndpointError::Internal {
            message,
            diagnostic,
        }) => {
            let mut details = json!({ "message": message });
            if let Some(diagnostic) = diagnostic {
                details["lastRequest"] = diagnostic;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::failure("Internal Server Error".into(), Some(details)),
            )
        }
    }
}

fn respond<T: Serialize>(outcome: Outcome<T>) -> Response {
    let (status, body) = envelope(outcome);
    (status, Json(body)).into_response()
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(dashboard: Dashboard) -> Router {
    Router::new()
        .route("/api/config", get(client_config))
        .route("/api/outages/active", get(active_outages))
        .route("/api/outages/history", get(outage_history))
        .route("/api/monitoring/alerts", get(alerts))
        .route("/api/servicenow/tickets", get(tickets))
        .route("/api/changes/today", get(changes_today))
        .route("/api/vendors/status", get(vendor_statuses))
        .with_state(dashboard)
}

async fn client_config(State(dashboard): State<Dashboard>) -> Json<ClientConfig> {
    Json(dashboard.client_config())
}

async fn active_outages(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.active_outages().await)
}

async fn outage_history(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.outage_history().await)
}

async fn alerts(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.alerts().await)
}

async fn tickets(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.tickets().await)
}

async fn changes_today(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.changes_today().await)
}

async fn vendor_statuses(State(dashboard): State<Dashboard>) -> Response {
    respond(dashboard.vendor_statuses().await)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use axum::body::{self, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use aegis_core::store::SOLARWINDS_KEY;
    use aegis_core::{
        ConfigResolver, ConfigStore, MemorySecrets, MemoryStore, StaticSettings, StoreError,
        TransportConfig,
    };

    use super::*;

    // ── Helpers ─────────────────────────────────────────────────────

    fn app(store: Arc<dyn ConfigStore>) -> Router {
        let settings = ConfigResolver::new(store, StaticSettings::default());
        let http = TransportConfig::default().build_client().unwrap();
        router(Dashboard::new(settings, Arc::new(MemorySecrets::new()), http))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn document(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    // ── Envelope ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_demo_outages_are_wrapped() {
        let store = MemoryStore::new();
        store.set("DEMO_MODE", "true");
        let (status, body) = get_json(app(Arc::new(store)), "/api/outages/active").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"][0]["impactLevel"], json!("SEV1"));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_is_empty_success() {
        let (status, body) =
            get_json(app(Arc::new(MemoryStore::new())), "/api/servicenow/tickets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": [] }));
    }

    #[tokio::test]
    async fn test_client_error_is_bad_request() {
        let store = MemoryStore::new();
        store.set(
            SOLARWINDS_KEY,
            json!({ "enabled": true, "apiUrl": "https://orion.example.com:17774" }),
        );
        let (status, body) = get_json(app(Arc::new(store)), "/api/monitoring/alerts").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "error": "SolarWinds credentials are not set." })
        );
    }

    #[tokio::test]
    async fn test_store_outage_is_internal_error() {
        let (status, body) = get_json(app(Arc::new(BrokenStore)), "/api/outages/history").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Internal Server Error"));
        assert!(
            body["details"]["message"]
                .as_str()
                .unwrap()
                .contains("offline")
        );
    }

    #[tokio::test]
    async fn test_client_config_is_not_enveloped() {
        let store = MemoryStore::new();
        store.set("ENABLE_MANAGEMENT", "yes");
        let (status, body) = get_json(app(Arc::new(store)), "/api/config").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "enableManagement": true }));
    }

    #[test]
    fn internal_error_carries_last_request() {
        let outcome: Outcome<u8> = Outcome::Failed(EndpointError::Internal {
            message: "boom".into(),
            diagnostic: Some(json!({ "endpoint": "Tickets" })),
        });
        let (status, body) = envelope(outcome);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.details,
            Some(json!({ "message": "boom", "lastRequest": { "endpoint": "Tickets" } }))
        );
    }
}
