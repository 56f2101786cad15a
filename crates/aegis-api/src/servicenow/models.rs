use serde::Deserialize;

/// `sysparm_display_value` mode.
///
/// With `True`, reference fields come back as their display label; with
/// `All`, every field is a `{ "display_value": .., "value": .. }` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayValue {
    #[default]
    True,
    All,
}

impl DisplayValue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::All => "all",
        }
    }
}

/// A fully-specified table query, ready to be encoded into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    /// Encoded-query filter (`sysparm_query`), unencoded.
    pub filter: String,
    /// Field names for `sysparm_fields`, in request order.
    pub fields: Vec<String>,
    pub display_value: DisplayValue,
    pub limit: Option<u32>,
}

/// Standard table API envelope.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    pub result: Vec<serde_json::Value>,
}
