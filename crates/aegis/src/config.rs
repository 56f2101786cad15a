//! Wires deployment configuration into a [`Dashboard`].
//!
//! The CLI layers its own flags on top of `aegis_config`: `--config`
//! picks the file and `--demo` sets the demo fallback.

use std::path::PathBuf;
use std::sync::Arc;

use aegis_config::{Deployment, FileStore, SecretChain};
use aegis_core::{ConfigResolver, CoreError, Dashboard};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(aegis_config::config_path)
}

/// Load the deployment and apply CLI overrides.
pub fn load_deployment(global: &GlobalOpts) -> Result<Deployment, CliError> {
    let mut deployment = aegis_config::load_deployment(&config_file(global))?;
    if global.demo {
        deployment.demo_mode = Some("true".into());
    }
    Ok(deployment)
}

/// Build the dashboard engine over the settings file and secret chain.
pub fn build_dashboard(global: &GlobalOpts, deployment: &Deployment) -> Result<Dashboard, CliError> {
    let settings_path = deployment.settings_path(&config_file(global));
    tracing::debug!(settings = %settings_path.display(), "using settings file");

    let http = deployment
        .transport()
        .build_client()
        .map_err(CoreError::from)?;
    let settings = ConfigResolver::new(
        Arc::new(FileStore::new(settings_path)),
        deployment.static_settings(),
    );
    Ok(Dashboard::new(settings, Arc::new(SecretChain::new()), http))
}
