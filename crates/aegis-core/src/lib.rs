//! Normalization and resilience engine behind the Aegis status dashboard.
//!
//! This crate turns per-deployment configuration into upstream queries,
//! maps whatever JSON comes back into a small canonical model, and decides
//! how each dashboard panel degrades when something is missing or broken:
//!
//! - **[`Dashboard`]**: one async method per dashboard endpoint, each
//!   resolving to an [`Outcome`]. Demo mode, unconfigured integrations,
//!   missing credentials, and upstream failures are all handled here.
//!
//! - **[`ConfigResolver`]**: typed settings read from a mutable
//!   [`ConfigStore`] with static fallbacks. Never fails.
//!
//! - **Normalization**: [`resolve::FieldValue`] (dotted-path property
//!   access), [`dates`] (date coercion), [`mapping::MappingTable`]
//!   (configurable classification), [`query`] (encoded queries), and
//!   [`convert`] (row-to-entity mapping).
//!
//! - **Domain model** ([`model`]): `Outage`, `MonitoringAlert`,
//!   `ServiceNowTicket`, `ScheduledChange`, `VendorStatus`.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod dates;
pub mod demo;
pub mod error;
pub mod mapping;
pub mod model;
pub mod outcome;
pub mod query;
pub mod resolve;
pub mod settings;
pub mod store;
pub mod vendor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    ChangeFieldMapping, ImpactMapping, OutageFieldMapping, ServiceNowConfig, SolarWindsConfig,
    StatusType, TicketFieldMapping, VendorProbe,
};
pub use dashboard::{ClientConfig, Dashboard};
pub use error::CoreError;
pub use outcome::{EmptyReason, EndpointError, Outcome};
pub use settings::{ConfigResolver, StaticSettings};
pub use store::{ConfigStore, MemorySecrets, MemoryStore, SecretStore, StoreError};

// Transport settings are owned by the API layer; re-exported for config loaders.
pub use aegis_api::{Error as TransportError, TlsMode, TransportConfig};

pub use model::{
    AlertSeverity, Eta, ImpactLevel, MonitoringAlert, Outage, ScheduledChange, ServiceNowTicket,
    VendorHealth, VendorStatus,
};
