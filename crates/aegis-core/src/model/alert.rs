// ── Monitoring alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

/// An active alert from the network-monitoring platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringAlert {
    pub id: String,
    /// Display title, `NODE — issue`.
    #[serde(rename = "type")]
    pub title: String,
    /// Link to the alerting entity, or a descriptive name.
    pub affected_system: String,
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
    /// Whether an operator has acknowledged the alert.
    pub validated: bool,
    /// Upper-cased node name; empty when the alert has no node.
    #[serde(default)]
    pub node_caption: String,
    #[serde(default)]
    pub issue: String,
}
