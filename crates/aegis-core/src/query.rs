// ── Upstream query construction ──
//
// Turns the configured table and field names into ServiceNow encoded
// queries, and owns the two SWQL statements used for monitoring alerts.
// Builders are pure; URL encoding happens in `aegis_api`.

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexSet;

use aegis_api::{DisplayValue, TableQuery};

use crate::config::ServiceNowConfig;
use crate::dates;

/// Row cap for history and change queries.
pub const BULK_LIMIT: u32 = 200;

/// Deduplicate field names, keeping first-seen order and dropping blanks.
fn field_list<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    fields
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn outage_fields(config: &ServiceNowConfig) -> Vec<String> {
    field_list(
        ["sys_id", "number"]
            .into_iter()
            .chain(config.field_mapping.columns()),
    )
}

/// Ongoing outages: active with no end time, oldest first.
pub fn active_outages(config: &ServiceNowConfig) -> TableQuery {
    let fields = &config.field_mapping;
    TableQuery {
        table: config.outage_table.clone(),
        filter: format!("active=true^{}ISEMPTY^ORDERBY{}", fields.eta, fields.start_time),
        fields: outage_fields(config),
        display_value: DisplayValue::True,
        limit: None,
    }
}

/// Outages of the configured types that are ongoing or ended within the
/// last `history_days`.
pub fn outage_history(config: &ServiceNowConfig, now: DateTime<Utc>) -> TableQuery {
    let fields = &config.field_mapping;
    // Windows reaching past the representable range cover all history.
    let since = TimeDelta::try_days(i64::from(config.history_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::UNIX_EPOCH);
    let impact = &fields.impact_level;
    let eta = &fields.eta;
    TableQuery {
        table: config.outage_table.clone(),
        filter: format!(
            "{impact}IN{types}^{impact}ISNOTEMPTY^{eta}ISEMPTY^OR{eta}>={since}^ORDERBY{start}",
            types = config.history_types.join(","),
            since = dates::servicenow_timestamp(since),
            start = fields.start_time,
        ),
        fields: outage_fields(config),
        display_value: DisplayValue::True,
        limit: Some(BULK_LIMIT),
    }
}

/// Open tickets at the configured priority, most recently updated first.
pub fn tickets(config: &ServiceNowConfig) -> TableQuery {
    let mapping = &config.ticket_field_mapping;
    TableQuery {
        table: config.ticket_table.clone(),
        filter: format!(
            "stateNOT IN{excluded}^{priority}={value}^ORDERBYDESCsys_updated_on",
            excluded = config.ticket_excluded_states.join(","),
            priority = mapping.priority,
            value = config.ticket_priority,
        ),
        fields: field_list(["sys_id"].into_iter().chain(mapping.columns())),
        display_value: DisplayValue::True,
        limit: Some(config.ticket_limit),
    }
}

/// Changes whose concrete or planned window overlaps today.
pub fn changes_today(config: &ServiceNowConfig) -> TableQuery {
    let mapping = &config.change_field_mapping;
    let states = format!("active=true^stateIN{}", config.change_state_codes.join(","));
    let overlap = |start: &str, end: &str| {
        format!(
            "{start}<=javascript:gs.endOfToday()^{end}>=javascript:gs.beginningOfToday()"
        )
    };
    TableQuery {
        table: config.change_table.clone(),
        filter: format!(
            "{states}^{concrete}^NQ{states}^{planned}^ORDERBY{start}^ORDERBY{planned_start}",
            concrete = overlap(&mapping.start, &mapping.end),
            planned = overlap(&mapping.planned_start, &mapping.planned_end),
            start = mapping.start,
            planned_start = mapping.planned_start,
        ),
        fields: field_list(["sys_id"].into_iter().chain(mapping.columns())),
        display_value: DisplayValue::All,
        limit: Some(BULK_LIMIT),
    }
}

// ── Monitoring ──────────────────────────────────────────────────────

/// The two SWQL statements for active alerts. `Fallback` drops the
/// columns some SWIS versions reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertQuery {
    Primary,
    Fallback,
}

impl AlertQuery {
    pub fn swql(self) -> &'static str {
        match self {
            Self::Primary => concat!(
                "SELECT aa.AlertObjectID, ",
                "ao.EntityCaption, ao.RelatedNodeCaption, ao.EntityType, ao.EntityDetailsUrl, ",
                "aa.TriggeredDateTime, aa.Acknowledged ",
                "FROM Orion.AlertActive AS aa ",
                "JOIN Orion.AlertObjects AS ao ON aa.AlertObjectID = ao.AlertObjectID ",
                "ORDER BY aa.TriggeredDateTime DESC",
            ),
            Self::Fallback => concat!(
                "SELECT aa.AlertObjectID, ",
                "ao.EntityCaption, ao.RelatedNodeCaption, ao.EntityType, ao.EntityDetailsUrl ",
                "FROM Orion.AlertActive AS aa ",
                "JOIN Orion.AlertObjects AS ao ON aa.AlertObjectID = ao.AlertObjectID ",
                "ORDER BY aa.AlertObjectID DESC",
            ),
        }
    }
}
