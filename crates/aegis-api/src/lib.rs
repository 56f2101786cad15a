// aegis-api: Async HTTP clients for the systems behind the status dashboard.
//
// Three upstream surfaces share one transport and one fetcher:
// ServiceNow's REST table API, the SolarWinds Information Service query
// endpoint, and arbitrary vendor status-page JSON documents.

pub mod auth;
pub mod error;
pub mod fetch;
pub mod servicenow;
pub mod solarwinds;
pub mod status_page;
pub mod transport;

pub use auth::BasicCredentials;
pub use error::Error;
pub use fetch::{Diagnostic, Fetched};
pub use servicenow::{DisplayValue, ServiceNowClient, TableQuery, TableResponse};
pub use solarwinds::{QueryResponse, SolarWindsClient};
pub use status_page::StatusPageClient;
pub use transport::{TlsMode, TransportConfig};
