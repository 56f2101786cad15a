// ── Dashboard: per-endpoint resilience policy ──
//
// Each endpoint walks the same short-circuit chain:
//
//   demo → unconfigured → missing credentials → primary query
//        → (alerts only) one fallback query on HTTP 400 → normalize
//
// How an endpoint degrades when credentials are missing or the upstream
// call fails is table-driven (`EndpointPolicy`). Anything unexpected
// inside an endpoint, including a panic, is caught at the boundary and
// reported as an internal error carrying the last redacted diagnostic.

use std::fmt::Display;
use std::future::Future;
use std::ops::ControlFlow;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures_util::FutureExt;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use aegis_api::{
    BasicCredentials, Diagnostic, Fetched, QueryResponse, ServiceNowClient, SolarWindsClient,
    StatusPageClient, TableQuery, TableResponse,
};

use crate::config::{self, ServiceNowConfig, SolarWindsConfig, VendorProbe};
use crate::convert::{self, AlertContext};
use crate::demo;
use crate::error::CoreError;
use crate::model::{MonitoringAlert, Outage, ScheduledChange, ServiceNowTicket, VendorStatus};
use crate::outcome::{EmptyReason, EndpointError, Outcome};
use crate::query::{self, AlertQuery};
use crate::settings::ConfigResolver;
use crate::store::{SERVICENOW_KEY, SOLARWINDS_KEY, SecretStore, VENDORS_KEY};
use crate::vendor::VendorProber;

// ── Policy table ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Degrade {
    /// Report success with no rows.
    Empty,
    /// Report a client error.
    Error,
}

#[derive(Debug, Clone, Copy)]
struct EndpointPolicy {
    name: &'static str,
    missing_credentials: Degrade,
    upstream_failure: Degrade,
}

const ACTIVE_OUTAGES: EndpointPolicy = EndpointPolicy {
    name: "ActiveOutages",
    missing_credentials: Degrade::Empty,
    upstream_failure: Degrade::Empty,
};

const OUTAGE_HISTORY: EndpointPolicy = EndpointPolicy {
    name: "OutageHistory",
    missing_credentials: Degrade::Error,
    upstream_failure: Degrade::Empty,
};

const TICKETS: EndpointPolicy = EndpointPolicy {
    name: "ServiceNowTickets",
    missing_credentials: Degrade::Error,
    upstream_failure: Degrade::Error,
};

const CHANGES_TODAY: EndpointPolicy = EndpointPolicy {
    name: "ChangesToday",
    missing_credentials: Degrade::Error,
    upstream_failure: Degrade::Error,
};

const MONITORING_ALERTS: EndpointPolicy = EndpointPolicy {
    name: "MonitoringAlerts",
    missing_credentials: Degrade::Error,
    upstream_failure: Degrade::Error,
};

const VENDOR_STATUS: &str = "VendorStatus";

impl EndpointPolicy {
    fn degrade<T>(self, mode: Degrade, reason: EmptyReason, message: String) -> Outcome<T> {
        match mode {
            Degrade::Empty => {
                warn!(endpoint = self.name, %reason, %message, "degrading to empty result");
                Outcome::Empty(reason)
            }
            Degrade::Error => {
                warn!(endpoint = self.name, %message, "endpoint failed");
                Outcome::Failed(EndpointError::client(message))
            }
        }
    }

    fn missing_credentials<T>(self, integration: &str) -> Outcome<T> {
        self.degrade(
            self.missing_credentials,
            EmptyReason::MissingCredentials,
            format!("{integration} credentials are not set."),
        )
    }

    fn upstream_failure<T>(self, message: String) -> Outcome<T> {
        self.degrade(self.upstream_failure, EmptyReason::UpstreamFailure, message)
    }

    /// A configured base URL that can't be used degrades like an
    /// upstream failure, but reads as unconfigured when it empties.
    fn unusable_endpoint<T>(self, message: String) -> Outcome<T> {
        self.degrade(self.upstream_failure, EmptyReason::Unconfigured, message)
    }
}

// ── Diagnostics capture ─────────────────────────────────────────────

/// Last upstream exchange seen by an endpoint, for internal-error reports.
#[derive(Clone, Default)]
struct RequestTrace(Arc<Mutex<Option<Diagnostic>>>);

impl RequestTrace {
    fn record(&self, fetched: &Fetched) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(fetched.diagnostic.clone());
        }
    }

    fn last_json(&self) -> Option<Value> {
        self.0.lock().ok()?.as_ref().map(Diagnostic::to_json)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "endpoint panicked".to_owned())
}

/// Run an endpoint body, converting errors and panics into
/// `EndpointError::Internal`.
async fn guarded<T, F>(endpoint: &'static str, trace: RequestTrace, body: F) -> Outcome<T>
where
    F: Future<Output = Result<Outcome<T>, CoreError>>,
{
    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            error!(endpoint, error = %err, "endpoint error");
            Outcome::Failed(EndpointError::Internal {
                message: err.to_string(),
                diagnostic: trace.last_json(),
            })
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(endpoint, %message, "endpoint panicked");
            Outcome::Failed(EndpointError::Internal {
                message,
                diagnostic: trace.last_json(),
            })
        }
    }
}

/// Shape of `GET /api/config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub enable_management: bool,
}

// ── Dashboard ───────────────────────────────────────────────────────

struct ServiceNowSession {
    config: ServiceNowConfig,
    client: ServiceNowClient,
}

/// Entry point for every dashboard read. Cheap to clone.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    settings: ConfigResolver,
    secrets: Arc<dyn SecretStore>,
    http: reqwest::Client,
}

impl Dashboard {
    pub fn new(
        settings: ConfigResolver,
        secrets: Arc<dyn SecretStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                settings,
                secrets,
                http,
            }),
        }
    }

    pub fn settings(&self) -> &ConfigResolver {
        &self.inner.settings
    }

    fn secret(&self, name: &str) -> Option<SecretString> {
        self.inner
            .secrets
            .secret(name)
            .filter(|s| !s.expose_secret().is_empty())
    }

    fn credentials(&self, username_var: &str, password_var: &str) -> Option<BasicCredentials> {
        let username = self.secret(username_var)?;
        let password = self.secret(password_var)?;
        Some(BasicCredentials::new(username.expose_secret(), password))
    }

    // ── Public endpoints ─────────────────────────────────────────────

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            enable_management: self.settings().management_enabled(),
        }
    }

    pub async fn active_outages(&self) -> Outcome<Outage> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::outages(Utc::now()));
        }
        let trace = RequestTrace::default();
        let policy = ACTIVE_OUTAGES;
        guarded(policy.name, trace.clone(), async move {
            let session = match self.connect_servicenow(policy)? {
                ControlFlow::Continue(session) => session,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let query = query::active_outages(&session.config);
            let rows = match table_rows(policy, &trace, &session, &query).await {
                ControlFlow::Continue(rows) => rows,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let outages = convert::outages(&rows, &session.config, Utc::now());
            info!(endpoint = policy.name, count = outages.len(), "returning outages");
            Ok(Outcome::Ready(outages))
        })
        .await
    }

    pub async fn outage_history(&self) -> Outcome<Outage> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::history(Utc::now()));
        }
        let trace = RequestTrace::default();
        let policy = OUTAGE_HISTORY;
        guarded(policy.name, trace.clone(), async move {
            let session = match self.connect_servicenow(policy)? {
                ControlFlow::Continue(session) => session,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let now = Utc::now();
            let query = query::outage_history(&session.config, now);
            let rows = match table_rows(policy, &trace, &session, &query).await {
                ControlFlow::Continue(rows) => rows,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let outages = convert::history(&rows, &session.config, now);
            info!(endpoint = policy.name, count = outages.len(), "returning outage history");
            Ok(Outcome::Ready(outages))
        })
        .await
    }

    pub async fn tickets(&self) -> Outcome<ServiceNowTicket> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::tickets());
        }
        let trace = RequestTrace::default();
        let policy = TICKETS;
        guarded(policy.name, trace.clone(), async move {
            let session = match self.connect_servicenow(policy)? {
                ControlFlow::Continue(session) => session,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let query = query::tickets(&session.config);
            let rows = match table_rows(policy, &trace, &session, &query).await {
                ControlFlow::Continue(rows) => rows,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let tickets =
                convert::tickets(&rows, &session.config, session.client.instance_url());
            info!(endpoint = policy.name, count = tickets.len(), "returning tickets");
            Ok(Outcome::Ready(tickets))
        })
        .await
    }

    pub async fn changes_today(&self) -> Outcome<ScheduledChange> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::changes(Utc::now()));
        }
        let trace = RequestTrace::default();
        let policy = CHANGES_TODAY;
        guarded(policy.name, trace.clone(), async move {
            let session = match self.connect_servicenow(policy)? {
                ControlFlow::Continue(session) => session,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let query = query::changes_today(&session.config);
            let rows = match table_rows(policy, &trace, &session, &query).await {
                ControlFlow::Continue(rows) => rows,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let changes =
                convert::changes(&rows, &session.config, session.client.instance_url());
            info!(endpoint = policy.name, count = changes.len(), "returning changes");
            Ok(Outcome::Ready(changes))
        })
        .await
    }

    pub async fn alerts(&self) -> Outcome<MonitoringAlert> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::alerts(Utc::now()));
        }
        let trace = RequestTrace::default();
        let policy = MONITORING_ALERTS;
        guarded(policy.name, trace.clone(), async move {
            let client = match self.connect_solarwinds(policy)? {
                ControlFlow::Continue(client) => client,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };

            let response = match client.query(policy.name, AlertQuery::Primary.swql()).await {
                Ok(primary) if primary.status == StatusCode::BAD_REQUEST => {
                    trace.record(&primary);
                    warn!(
                        endpoint = policy.name,
                        body = %primary.raw,
                        "primary alert query rejected, retrying with reduced query"
                    );
                    client.query(policy.name, AlertQuery::Fallback.swql()).await
                }
                other => other,
            };

            let fetched = match accept(policy, &trace, "SolarWinds", response) {
                ControlFlow::Continue(fetched) => fetched,
                ControlFlow::Break(outcome) => return Ok(outcome),
            };
            let rows = match fetched.decode::<QueryResponse>() {
                Ok(envelope) => envelope.results,
                Err(e) => {
                    let message = format!("Invalid response from SolarWinds: {e}");
                    return Ok(policy.upstream_failure(message));
                }
            };

            let ctx = self.alert_context(&client);
            let alerts = convert::alerts(&rows, &ctx, Utc::now());
            info!(endpoint = policy.name, count = alerts.len(), "returning alerts");
            Ok(Outcome::Ready(alerts))
        })
        .await
    }

    pub async fn vendor_statuses(&self) -> Outcome<VendorStatus> {
        if self.settings().demo_mode() {
            return Outcome::Ready(demo::vendors());
        }
        guarded(VENDOR_STATUS, RequestTrace::default(), async move {
            let vendors: Vec<VendorProbe> =
                config::load(self.settings().store().as_ref(), VENDORS_KEY)?;
            if vendors.is_empty() {
                return Ok(Outcome::Empty(EmptyReason::Unconfigured));
            }
            let prober = VendorProber::new(StatusPageClient::new(self.inner.http.clone()));
            let statuses = prober.probe_all(&vendors).await;
            info!(endpoint = VENDOR_STATUS, count = statuses.len(), "returning vendor statuses");
            Ok(Outcome::Ready(statuses))
        })
        .await
    }

    // ── Connection helpers ───────────────────────────────────────────

    fn connect_servicenow<T>(
        &self,
        policy: EndpointPolicy,
    ) -> Result<ControlFlow<Outcome<T>, ServiceNowSession>, CoreError> {
        let config: ServiceNowConfig =
            config::load(self.settings().store().as_ref(), SERVICENOW_KEY)?;

        let Some(instance) = config.active_instance() else {
            debug!(endpoint = policy.name, "ServiceNow not enabled or configured");
            return Ok(ControlFlow::Break(Outcome::Empty(EmptyReason::Unconfigured)));
        };
        let Some(credentials) = self.credentials(&config.username_var, &config.password_var)
        else {
            return Ok(ControlFlow::Break(policy.missing_credentials("ServiceNow")));
        };

        match ServiceNowClient::with_client(self.inner.http.clone(), instance, credentials) {
            Ok(client) => Ok(ControlFlow::Continue(ServiceNowSession { config, client })),
            Err(e) => Ok(ControlFlow::Break(
                policy.unusable_endpoint(format!("Invalid ServiceNow instance URL: {e}")),
            )),
        }
    }

    fn connect_solarwinds<T>(
        &self,
        policy: EndpointPolicy,
    ) -> Result<ControlFlow<Outcome<T>, SolarWindsClient>, CoreError> {
        let config: SolarWindsConfig =
            config::load(self.settings().store().as_ref(), SOLARWINDS_KEY)?;

        let Some(api_url) = config.active_api_url() else {
            debug!(endpoint = policy.name, "SolarWinds not enabled or configured");
            return Ok(ControlFlow::Break(Outcome::Empty(EmptyReason::Unconfigured)));
        };
        let Some(credentials) = self.credentials(&config.username_var, &config.password_var)
        else {
            return Ok(ControlFlow::Break(policy.missing_credentials("SolarWinds")));
        };

        let client = SolarWindsClient::with_client(self.inner.http.clone(), api_url, credentials)
            .and_then(|client| self.with_gateway_headers(client, &config));
        match client {
            Ok(client) => Ok(ControlFlow::Continue(client)),
            Err(e) => Ok(ControlFlow::Break(
                policy.unusable_endpoint(format!("Invalid SolarWinds configuration: {e}")),
            )),
        }
    }

    fn with_gateway_headers(
        &self,
        mut client: SolarWindsClient,
        config: &SolarWindsConfig,
    ) -> Result<SolarWindsClient, aegis_api::Error> {
        if let Some(code) = self.secret(&config.tunnel_code_var) {
            client = client.with_tunnel_code(&code)?;
        }
        if let (Some(id), Some(secret)) = (
            self.secret(&config.access_client_id_var),
            self.secret(&config.access_client_secret_var),
        ) {
            client = client.with_access_client(&id, &secret)?;
        }
        Ok(client)
    }

    fn alert_context(&self, client: &SolarWindsClient) -> AlertContext {
        let settings = self.settings();
        let ui_base = settings.solarwinds_ui_base().and_then(|raw| {
            Url::parse(&raw)
                .inspect_err(|e| warn!(ui_base = %raw, error = %e, "ignoring invalid UI base"))
                .ok()
        });
        AlertContext {
            ui_base,
            api_base: Some(client.base_url().clone()),
            excluded: settings.excluded_captions(),
        }
    }
}

/// Run a table query and unwrap its `result` rows.
async fn table_rows<T>(
    policy: EndpointPolicy,
    trace: &RequestTrace,
    session: &ServiceNowSession,
    query: &TableQuery,
) -> ControlFlow<Outcome<T>, Vec<Value>> {
    let response = session.client.query_table(policy.name, query).await;
    let fetched = accept(policy, trace, "ServiceNow", response)?;
    match fetched.decode::<TableResponse>() {
        Ok(envelope) => ControlFlow::Continue(envelope.result),
        Err(e) => ControlFlow::Break(
            policy.upstream_failure(format!("Invalid response from ServiceNow: {e}")),
        ),
    }
}

/// Record the exchange and stop on transport failure or a non-2xx status.
fn accept<T>(
    policy: EndpointPolicy,
    trace: &RequestTrace,
    upstream: &str,
    response: Result<Fetched, aegis_api::Error>,
) -> ControlFlow<Outcome<T>, Fetched> {
    match response {
        Err(e) => ControlFlow::Break(policy.upstream_failure(failure(upstream, &e))),
        Ok(fetched) => {
            trace.record(&fetched);
            if fetched.is_success() {
                ControlFlow::Continue(fetched)
            } else {
                ControlFlow::Break(policy.upstream_failure(failure(upstream, fetched.reason())))
            }
        }
    }
}

fn failure(upstream: &str, reason: impl Display) -> String {
    format!("Failed to fetch from {upstream}: {reason}")
}
