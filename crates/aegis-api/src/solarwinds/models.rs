use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body for the SWIS query endpoint.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Response envelope. Rows are kept untyped: the column set depends on
/// which SWQL statement produced them.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "rows_or_empty")]
    pub results: Vec<Value>,
}

/// `results` that is null or not an array carries no rows.
fn rows_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(rows) => rows,
        _ => Vec::new(),
    })
}
