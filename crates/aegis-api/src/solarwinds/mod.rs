// SolarWinds Information Service (SWIS) JSON query API
//
// `POST {base}/SolarWinds/InformationService/v3/Json/Query` with a SWQL
// statement in a `{ "query": ".." }` body; rows come back under `results`.
// Deployments behind an access gateway need extra headers (tunnel code,
// client id/secret), which the client carries as sensitive defaults.

pub mod client;
pub mod models;

pub use client::{QUERY_PATH, SolarWindsClient};
pub use models::{QueryRequest, QueryResponse};
