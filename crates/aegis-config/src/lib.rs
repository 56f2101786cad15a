//! Deployment configuration for the Aegis dashboard server.
//!
//! Three concerns live here, all feeding `aegis_core`:
//!
//! - **[`Deployment`]**: process-level settings (listen address, timeout,
//!   TLS, static fallbacks) loaded once at startup via figment from
//!   defaults, a TOML file, and the environment.
//! - **[`FileStore`]**: the mutable settings document, a TOML file re-read
//!   on every access so edits apply without a restart.
//! - **[`SecretChain`]**: credential lookup by variable name, environment
//!   first and the system keyring second.

mod secrets;
mod store;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use aegis_core::settings::{
    DEMO_MODE, ENABLE_MANAGEMENT, SOLARWINDS_EXCLUDE_CAPTIONS, SOLARWINDS_UI_BASE,
};
use aegis_core::{StaticSettings, TlsMode, TransportConfig};

pub use secrets::{KEYRING_SERVICE, SecretChain};
pub use store::FileStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Deployment ──────────────────────────────────────────────────────

/// Environment variables read without a prefix, as static fallbacks for
/// the settings of the same name.
pub const FALLBACK_VARS: [&str; 4] = [
    DEMO_MODE,
    ENABLE_MANAGEMENT,
    SOLARWINDS_UI_BASE,
    SOLARWINDS_EXCLUDE_CAPTIONS,
];

/// Prefix for every other environment override (`AEGIS_LISTEN`, ...).
pub const ENV_PREFIX: &str = "AEGIS_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deployment {
    /// Socket address the dashboard API binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Per-call upstream timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept invalid upstream certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Extra CA certificate (PEM) for on-prem upstreams.
    pub ca_cert: Option<PathBuf>,

    /// Mutable settings document. Defaults to `settings.toml` next to the
    /// config file.
    pub settings_file: Option<PathBuf>,

    // Static fallbacks. Env values arrive typed, so accept any scalar.
    #[serde(default, deserialize_with = "lenient_string")]
    pub demo_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub enable_management: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub solarwinds_ui_base: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub solarwinds_exclude_captions: Option<String>,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            timeout_secs: default_timeout(),
            insecure: false,
            ca_cert: None,
            settings_file: None,
            demo_mode: None,
            enable_management: None,
            solarwinds_ui_base: None,
            solarwinds_exclude_captions: None,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8787".into()
}
fn default_timeout() -> u64 {
    30
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Flag(bool),
    Int(i64),
    Float(f64),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Flag(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

impl Deployment {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen.parse().map_err(|_| ConfigError::Validation {
            field: "listen".into(),
            reason: format!("expected host:port, got '{}'", self.listen),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };
        TransportConfig {
            tls,
            timeout: self.timeout(),
        }
    }

    /// Fallbacks for the config resolver.
    pub fn static_settings(&self) -> StaticSettings {
        StaticSettings {
            demo_mode: self.demo_mode.clone(),
            enable_management: self.enable_management.clone(),
            solarwinds_ui_base: self.solarwinds_ui_base.clone(),
            solarwinds_exclude_captions: self.solarwinds_exclude_captions.clone(),
        }
    }

    /// Settings document path: explicit, else beside `config_file`.
    pub fn settings_path(&self, config_file: &Path) -> PathBuf {
        self.settings_file.clone().unwrap_or_else(|| {
            config_file
                .parent()
                .map_or_else(|| PathBuf::from("settings.toml"), |dir| dir.join("settings.toml"))
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aegis", "aegis").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aegis");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Provider chain: defaults, then the TOML file, then bare fallback
/// variables, then `AEGIS_`-prefixed overrides.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Deployment::default()))
        .merge(Toml::file(path))
        .merge(Env::raw().only(&FALLBACK_VARS))
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Load the deployment from `path` (a missing file is fine) and the
/// environment.
pub fn load_deployment(path: &Path) -> Result<Deployment, ConfigError> {
    let deployment: Deployment = figment(path).extract()?;
    deployment.listen_addr()?;
    Ok(deployment)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("config.toml");
            let deployment = load_deployment(&path).unwrap();
            assert_eq!(deployment, Deployment::default());
            assert_eq!(deployment.listen_addr().unwrap().port(), 8787);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    listen = "0.0.0.0:9000"
                    timeout_secs = 10
                    demo_mode = "false"
                    solarwinds_ui_base = "https://orion.example.com"
                "#,
            )?;
            jail.set_env("AEGIS_TIMEOUT_SECS", "5");
            jail.set_env("DEMO_MODE", "true");

            let path = jail.directory().join("config.toml");
            let deployment = load_deployment(&path).unwrap();
            assert_eq!(deployment.listen, "0.0.0.0:9000");
            assert_eq!(deployment.timeout(), Duration::from_secs(5));

            let statics = deployment.static_settings();
            assert_eq!(statics.demo_mode.as_deref(), Some("true"));
            assert_eq!(
                statics.solarwinds_ui_base.as_deref(),
                Some("https://orion.example.com")
            );
            Ok(())
        });
    }

    #[test]
    fn numeric_env_fallback_is_kept_as_text() {
        Jail::expect_with(|jail| {
            jail.set_env("ENABLE_MANAGEMENT", "1");
            let deployment = load_deployment(&jail.directory().join("none.toml")).unwrap();
            assert_eq!(deployment.enable_management.as_deref(), Some("1"));
            Ok(())
        });
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("AEGIS_LISTEN", "not-an-address");
            let err = load_deployment(&jail.directory().join("config.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "listen"));
            Ok(())
        });
    }

    #[test]
    fn insecure_wins_over_custom_ca() {
        let deployment = Deployment {
            insecure: true,
            ca_cert: Some(PathBuf::from("/etc/ssl/orion.pem")),
            ..Deployment::default()
        };
        assert!(matches!(deployment.transport().tls, TlsMode::DangerAcceptInvalid));

        let deployment = Deployment {
            ca_cert: Some(PathBuf::from("/etc/ssl/orion.pem")),
            ..Deployment::default()
        };
        assert!(matches!(deployment.transport().tls, TlsMode::CustomCa(_)));
    }

    #[test]
    fn settings_file_defaults_beside_config() {
        let deployment = Deployment::default();
        assert_eq!(
            deployment.settings_path(Path::new("/etc/aegis/config.toml")),
            PathBuf::from("/etc/aegis/settings.toml")
        );

        let deployment = Deployment {
            settings_file: Some(PathBuf::from("/srv/aegis.toml")),
            ..Deployment::default()
        };
        assert_eq!(
            deployment.settings_path(Path::new("/etc/aegis/config.toml")),
            PathBuf::from("/srv/aegis.toml")
        );
    }
}
