// ── Integration configuration ──
//
// Per-deployment documents describing how to reach each upstream system and
// which of its fields feed the canonical model. Stored as camelCase JSON in
// the config store; every field has a default so partial documents load.
// Credentials are referenced by variable *name* and resolved at call time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::{ConfigStore, StoreError};

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

// ── ServiceNow ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceNowConfig {
    pub enabled: bool,
    pub instance_url: Option<String>,
    pub username_var: String,
    pub password_var: String,
    pub outage_table: String,
    pub ticket_table: String,
    pub change_table: String,
    pub field_mapping: OutageFieldMapping,
    pub ticket_field_mapping: TicketFieldMapping,
    pub change_field_mapping: ChangeFieldMapping,
    pub impact_level_mapping: Vec<ImpactMapping>,
    pub history_days: u32,
    pub history_types: Vec<String>,
    pub ticket_excluded_states: Vec<String>,
    pub ticket_priority: String,
    pub ticket_limit: u32,
    pub change_state_codes: Vec<String>,
    pub change_state_labels: Vec<String>,
}

impl Default for ServiceNowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            instance_url: None,
            username_var: "SERVICENOW_USERNAME".into(),
            password_var: "SERVICENOW_PASSWORD".into(),
            outage_table: "cmdb_ci_outage".into(),
            ticket_table: "incident".into(),
            change_table: "change_request".into(),
            field_mapping: OutageFieldMapping::default(),
            ticket_field_mapping: TicketFieldMapping::default(),
            change_field_mapping: ChangeFieldMapping::default(),
            impact_level_mapping: Vec::new(),
            history_days: 7,
            history_types: owned(&["outage", "degradation"]),
            ticket_excluded_states: owned(&["6", "7", "8"]),
            ticket_priority: "1".into(),
            ticket_limit: 20,
            change_state_codes: owned(&["-2", "-1", "0", "1"]),
            change_state_labels: owned(&["scheduled", "implement", "review"]),
        }
    }
}

impl ServiceNowConfig {
    /// Instance URL when the integration is switched on and has one.
    pub fn active_instance(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.instance_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Outage table columns. `impact_level` is the outage *type* column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutageFieldMapping {
    pub system_name: String,
    pub impact_level: String,
    pub start_time: String,
    pub eta: String,
    pub description: String,
    pub teams_bridge_url: String,
}

impl Default for OutageFieldMapping {
    fn default() -> Self {
        Self {
            system_name: "cmdb_ci".into(),
            impact_level: "type".into(),
            start_time: "begin".into(),
            eta: "end".into(),
            description: "short_description".into(),
            teams_bridge_url: "u_bridge_url".into(),
        }
    }
}

impl OutageFieldMapping {
    /// Mapped columns in declaration order.
    pub fn columns(&self) -> [&str; 6] {
        [
            self.system_name.as_str(),
            self.impact_level.as_str(),
            self.start_time.as_str(),
            self.eta.as_str(),
            self.description.as_str(),
            self.teams_bridge_url.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketFieldMapping {
    pub id: String,
    pub summary: String,
    #[serde(rename = "affectedCI")]
    pub affected_ci: String,
    pub status: String,
    pub assigned_team: String,
    pub priority: String,
}

impl Default for TicketFieldMapping {
    fn default() -> Self {
        Self {
            id: "number".into(),
            summary: "short_description".into(),
            affected_ci: "cmdb_ci".into(),
            status: "state".into(),
            assigned_team: "assignment_group".into(),
            priority: "priority".into(),
        }
    }
}

impl TicketFieldMapping {
    pub fn columns(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.summary.as_str(),
            self.affected_ci.as_str(),
            self.status.as_str(),
            self.assigned_team.as_str(),
            self.priority.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeFieldMapping {
    pub number: String,
    pub summary: String,
    pub state: String,
    #[serde(rename = "type")]
    pub change_type: String,
    pub start: String,
    pub end: String,
    pub planned_start: String,
    pub planned_end: String,
    pub offering: String,
}

impl Default for ChangeFieldMapping {
    fn default() -> Self {
        Self {
            number: "number".into(),
            summary: "short_description".into(),
            state: "state".into(),
            change_type: "type".into(),
            start: "start_date".into(),
            end: "end_date".into(),
            planned_start: "planned_start_date".into(),
            planned_end: "planned_end_date".into(),
            offering: "service_offering".into(),
        }
    }
}

impl ChangeFieldMapping {
    pub fn columns(&self) -> [&str; 9] {
        [
            self.number.as_str(),
            self.summary.as_str(),
            self.state.as_str(),
            self.change_type.as_str(),
            self.start.as_str(),
            self.end.as_str(),
            self.planned_start.as_str(),
            self.planned_end.as_str(),
            self.offering.as_str(),
        ]
    }
}

/// One row of the impact lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMapping {
    pub servicenow_value: String,
    pub dashboard_value: String,
}

// ── SolarWinds ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolarWindsConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    pub username_var: String,
    pub password_var: String,
    pub tunnel_code_var: String,
    pub access_client_id_var: String,
    pub access_client_secret_var: String,
}

impl Default for SolarWindsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: None,
            username_var: "SOLARWINDS_USERNAME".into(),
            password_var: "SOLARWINDS_PASSWORD".into(),
            tunnel_code_var: "SOLARWINDS_CUSTOM_HEADER".into(),
            access_client_id_var: "CF_ACCESS_CLIENT_ID".into(),
            access_client_secret_var: "CF_ACCESS_CLIENT_SECRET".into(),
        }
    }
}

impl SolarWindsConfig {
    pub fn active_api_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

// ── Vendors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    #[default]
    Manual,
    ApiJson,
}

/// A vendor whose public status page is shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProbe {
    pub id: String,
    pub name: String,
    /// Human-facing status page.
    pub url: String,
    #[serde(default)]
    pub status_type: StatusType,
    /// Machine-readable status document (`API_JSON` only).
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub json_path: Option<String>,
    /// Comma-separated list of values meaning "operational".
    #[serde(default)]
    pub expected_value: Option<String>,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Read and decode a document; a missing document yields `T::default()`.
pub fn load<T>(store: &dyn ConfigStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.document(key)? {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(doc) => serde_json::from_value(doc).map_err(|e| StoreError::Malformed {
            key: key.to_owned(),
            message: e.to_string(),
        }),
    }
}
