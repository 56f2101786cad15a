use serde::{Deserialize, Serialize};

/// An open high-priority ITSM incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceNowTicket {
    pub id: String,
    pub summary: String,
    #[serde(rename = "affectedCI")]
    pub affected_ci: String,
    /// State label as shown by the ITSM platform (`New`, `In Progress`, ..).
    pub status: String,
    pub assigned_team: String,
    pub ticket_url: String,
}
