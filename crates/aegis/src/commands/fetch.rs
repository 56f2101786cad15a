//! `aegis fetch <endpoint>`: run one dashboard endpoint and print its rows.
//!
//! Handy for checking an integration from a shell before wiring up the
//! frontend: the same resilience rules apply, so an unconfigured panel
//! prints `[]` and a failing one exits non-zero.

use serde::Serialize;

use aegis_core::{EndpointError, Outcome};

use crate::cli::{Endpoint, FetchArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: &FetchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let deployment = config::load_deployment(global)?;
    let dashboard = config::build_dashboard(global, &deployment)?;
    tracing::debug!(endpoint = ?args.endpoint, "fetching");

    let rendered = match args.endpoint {
        Endpoint::ActiveOutages => rows(args, dashboard.active_outages().await)?,
        Endpoint::OutageHistory => rows(args, dashboard.outage_history().await)?,
        Endpoint::Alerts => rows(args, dashboard.alerts().await)?,
        Endpoint::Tickets => rows(args, dashboard.tickets().await)?,
        Endpoint::ChangesToday => rows(args, dashboard.changes_today().await)?,
        Endpoint::Vendors => rows(args, dashboard.vendor_statuses().await)?,
        Endpoint::ClientConfig => render(args.output, &dashboard.client_config())?,
    };
    println!("{rendered}");
    Ok(())
}

fn rows<T: Serialize>(args: &FetchArgs, outcome: Outcome<T>) -> Result<String, CliError> {
    if let Outcome::Empty(reason) = &outcome {
        tracing::info!(%reason, "endpoint returned no rows");
    }
    match outcome.into_rows() {
        Ok(rows) => render(args.output, &rows),
        Err(EndpointError::Client { message }) => Err(CliError::Endpoint {
            endpoint: endpoint_name(args.endpoint).into(),
            message,
        }),
        Err(EndpointError::Internal { message, .. }) => Err(CliError::Internal { message }),
    }
}

fn render<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
    })
}

fn endpoint_name(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::ActiveOutages => "active-outages",
        Endpoint::OutageHistory => "outage-history",
        Endpoint::Alerts => "alerts",
        Endpoint::Tickets => "tickets",
        Endpoint::ChangesToday => "changes-today",
        Endpoint::Vendors => "vendors",
        Endpoint::ClientConfig => "client-config",
    }
}
