// ── Change-control domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A change request whose window overlaps today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledChange {
    pub id: String,
    pub number: String,
    pub offering: String,
    pub title: String,
    pub summary: String,
    pub state: String,
    #[serde(rename = "type")]
    pub change_type: String,
    /// Window start: the concrete start, else the planned start.
    pub start: Option<DateTime<Utc>>,
    /// Window end: the concrete end, else the planned end.
    pub end: Option<DateTime<Utc>>,
    pub url: String,
}
