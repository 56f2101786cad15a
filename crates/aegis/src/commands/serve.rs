//! `aegis serve`: run the dashboard HTTP API until interrupted.

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::{GlobalOpts, ServeArgs};
use crate::config;
use crate::error::CliError;
use crate::server;

pub async fn handle(args: &ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut deployment = config::load_deployment(global)?;
    if let Some(listen) = &args.listen {
        deployment.listen.clone_from(listen);
    }
    let addr = deployment.listen_addr()?;
    let dashboard = config::build_dashboard(global, &deployment)?;

    let listener = TcpListener::bind(addr).await.map_err(|source| CliError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!(%addr, timeout_secs = deployment.timeout_secs, "dashboard API listening");

    axum::serve(listener, server::router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("dashboard API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}
