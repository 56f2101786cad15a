// ── Upstream-to-domain conversions ──
//
// Maps raw upstream rows into canonical `aegis_core::model` types. Each
// converter composes property resolution, date normalization and the
// configured classification tables, and fills the dashboard's defaults for
// anything missing. Converters are total: a row never fails to convert.

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::Url;

use aegis_api::servicenow::record_link;

use crate::config::{OutageFieldMapping, ServiceNowConfig};
use crate::dates;
use crate::mapping::{MappingTable, impact_table};
use crate::model::{
    AlertSeverity, ImpactLevel, MonitoringAlert, Outage, ScheduledChange, ServiceNowTicket,
};
use crate::resolve::FieldValue;

// ── Helpers ────────────────────────────────────────────────────────

fn field(record: &Value, path: &str) -> FieldValue {
    FieldValue::resolve(record, path)
}

fn raw_field(record: &Value, path: &str) -> FieldValue {
    FieldValue::resolve_raw(record, path)
}

// ── Outages ────────────────────────────────────────────────────────

fn outage(
    record: &Value,
    mapping: &OutageFieldMapping,
    impacts: &MappingTable<ImpactLevel>,
    now: DateTime<Utc>,
) -> Outage {
    let impact = field(record, &mapping.impact_level);
    let id = field(record, "number")
        .into_option()
        .or_else(|| field(record, "sys_id").into_option())
        .unwrap_or_default();

    Outage {
        id,
        system_name: field(record, &mapping.system_name).text_or("Unknown System"),
        impact_level: impacts.classify(impact.as_str().unwrap_or_default()),
        start_time: dates::to_instant_at(field(record, &mapping.start_time).as_str(), now),
        eta: dates::eta_at(field(record, &mapping.eta).as_str(), now),
        description: field(record, &mapping.description).text_or("No description provided."),
        teams_bridge_url: field(record, &mapping.teams_bridge_url).into_option(),
    }
}

/// Active outages, one per row.
pub fn outages(records: &[Value], config: &ServiceNowConfig, now: DateTime<Utc>) -> Vec<Outage> {
    let impacts = impact_table(&config.impact_level_mapping);
    records
        .iter()
        .map(|record| outage(record, &config.field_mapping, &impacts, now))
        .collect()
}

/// Outage history. Rows without an impact value are dropped.
pub fn history(records: &[Value], config: &ServiceNowConfig, now: DateTime<Utc>) -> Vec<Outage> {
    let impacts = impact_table(&config.impact_level_mapping);
    let mapping = &config.field_mapping;
    records
        .iter()
        .filter(|record| field(record, &mapping.impact_level).non_empty().is_some())
        .map(|record| outage(record, mapping, &impacts, now))
        .collect()
}

// ── Tickets ────────────────────────────────────────────────────────

pub fn tickets(records: &[Value], config: &ServiceNowConfig, instance: &Url) -> Vec<ServiceNowTicket> {
    let mapping = &config.ticket_field_mapping;
    records
        .iter()
        .map(|record| ServiceNowTicket {
            id: field(record, &mapping.id).text_or("N/A"),
            summary: field(record, &mapping.summary).text_or("No summary"),
            affected_ci: field(record, &mapping.affected_ci).text_or("N/A"),
            status: field(record, &mapping.status).text_or("New"),
            assigned_team: field(record, &mapping.assigned_team).text_or("Unassigned"),
            ticket_url: record_link(
                instance,
                &config.ticket_table,
                &raw_field(record, "sys_id").text_or(""),
            ),
        })
        .collect()
}

// ── Changes ────────────────────────────────────────────────────────

/// Whether a change state label is one the dashboard shows.
fn shows_state(label: &str, allowed: &[String]) -> bool {
    let label = label.trim().to_lowercase();
    !label.is_empty()
        && !label.contains("cancel")
        && allowed
            .iter()
            .any(|word| label.contains(word.trim().to_lowercase().as_str()))
}

/// Concrete window edge if set, else the planned one.
fn window_edge(record: &Value, concrete: &str, planned: &str) -> Option<DateTime<Utc>> {
    let concrete = raw_field(record, concrete);
    let raw = match concrete.non_empty() {
        Some(value) => Some(value.to_owned()),
        None => raw_field(record, planned).into_option(),
    };
    dates::window_instant(raw.as_deref())
}

/// Changes for today's window, filtered to the configured state labels.
/// Expects rows fetched with `sysparm_display_value=all`.
pub fn changes(records: &[Value], config: &ServiceNowConfig, instance: &Url) -> Vec<ScheduledChange> {
    let mapping = &config.change_field_mapping;
    records
        .iter()
        .filter(|record| {
            shows_state(
                field(record, &mapping.state).as_str().unwrap_or_default(),
                &config.change_state_labels,
            )
        })
        .map(|record| {
            let sys_id = raw_field(record, "sys_id").text_or("");
            let summary = field(record, &mapping.summary).text_or("Change");
            ScheduledChange {
                id: raw_field(record, &mapping.number)
                    .into_option()
                    .unwrap_or_else(|| sys_id.clone()),
                number: field(record, &mapping.number)
                    .into_option()
                    .unwrap_or_else(|| sys_id.clone()),
                offering: field(record, &mapping.offering).text_or(""),
                title: summary.clone(),
                summary,
                state: field(record, &mapping.state).text_or(""),
                change_type: field(record, &mapping.change_type).text_or(""),
                start: window_edge(record, &mapping.start, &mapping.planned_start),
                end: window_edge(record, &mapping.end, &mapping.planned_end),
                url: record_link(instance, &config.change_table, &sys_id),
            }
        })
        .collect()
}

// ── Monitoring alerts ──────────────────────────────────────────────

/// SWIS entity type of a node; such alerts name the node in their caption.
const NODE_ENTITY_TYPE: &str = "Orion.Nodes";

/// Deployment inputs for alert conversion.
#[derive(Debug, Clone, Default)]
pub struct AlertContext {
    /// UI host that detail links are rewritten onto.
    pub ui_base: Option<Url>,
    /// SWIS API base; relative links resolve against its origin.
    pub api_base: Option<Url>,
    /// Lower-cased captions (or caption prefixes) to hide.
    pub excluded: Vec<String>,
}

impl AlertContext {
    fn is_excluded(&self, caption: &str) -> bool {
        let caption = caption.to_lowercase();
        self.excluded
            .iter()
            .any(|term| caption == *term || caption.starts_with(term.as_str()))
    }
}

fn is_absolute(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolve an alert details link for the dashboard.
///
/// With a UI base configured, both absolute and relative links are moved
/// onto it (path and query kept). Otherwise absolute links pass through
/// and relative ones resolve against the API host.
pub fn absolute_url(raw: Option<&str>, ctx: &AlertContext) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_owned();
    };
    let absolute = is_absolute(raw);

    if let Some(ui_base) = &ctx.ui_base {
        let rebased = if absolute {
            Url::parse(raw).and_then(|original| {
                let tail = match original.query() {
                    Some(q) => format!("{}?{q}", original.path()),
                    None => original.path().to_owned(),
                };
                ui_base.join(&tail)
            })
        } else {
            ui_base.join(raw)
        };
        if let Ok(url) = rebased {
            return url.to_string();
        }
    }

    if absolute {
        return raw.to_owned();
    }

    ctx.api_base
        .as_ref()
        .and_then(|base| {
            let origin = base.origin().ascii_serialization();
            Url::parse(&origin).and_then(|o| o.join(raw)).ok()
        })
        .map_or_else(|| raw.to_owned(), |url| url.to_string())
}

/// Node name and issue for an alert row. The node is the related node's
/// caption or, for node entities, the entity caption itself.
fn node_and_issue(row: &Value) -> (String, String) {
    let related = field(row, "RelatedNodeCaption").text_or("");
    let issue = field(row, "EntityCaption").text_or("Alert").trim().to_owned();
    let entity_type = field(row, "EntityType").text_or("");

    let node = match related.trim() {
        "" if entity_type == NODE_ENTITY_TYPE => issue.clone(),
        other => other.to_owned(),
    };
    (node.to_uppercase(), issue)
}

/// `NODE — issue`, or just the issue when there is no node.
pub fn alert_title(node_caption: &str, issue: &str) -> String {
    if node_caption.is_empty() {
        issue.to_owned()
    } else {
        format!("{node_caption} — {issue}")
    }
}

/// Active alerts, minus excluded captions.
pub fn alerts(rows: &[Value], ctx: &AlertContext, now: DateTime<Utc>) -> Vec<MonitoringAlert> {
    rows.iter()
        .filter(|row| !ctx.is_excluded(field(row, "EntityCaption").as_str().unwrap_or_default()))
        .map(|row| {
            let (node_caption, issue) = node_and_issue(row);
            MonitoringAlert {
                id: field(row, "AlertObjectID").text_or(""),
                title: alert_title(&node_caption, &issue),
                affected_system: absolute_url(field(row, "EntityDetailsUrl").as_str(), ctx),
                timestamp: dates::to_instant_at(field(row, "TriggeredDateTime").as_str(), now),
                severity: AlertSeverity::Info,
                validated: field(row, "Acknowledged").flag(),
                node_caption,
                issue,
            }
        })
        .collect()
}
