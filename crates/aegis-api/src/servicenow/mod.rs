// ServiceNow REST table API
//
// `GET {instance}/api/now/table/{table}` with an encoded-query filter,
// Basic auth, and a `{ "result": [...] }` response envelope. Records are
// returned untyped: field names come from per-deployment configuration.

pub mod client;
pub mod models;

pub use client::{ServiceNowClient, record_link};
pub use models::{DisplayValue, TableQuery, TableResponse};
