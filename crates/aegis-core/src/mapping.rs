// ── Configurable classification tables ──

use std::collections::HashMap;

use tracing::warn;

use crate::config::ImpactMapping;
use crate::model::ImpactLevel;

/// Source-value → canonical-value lookup with a default bucket.
///
/// Keys are normalized (trimmed, lower-cased) on insert and on lookup, so
/// classification ignores case and surrounding whitespace.
#[derive(Debug, Clone)]
pub struct MappingTable<V> {
    entries: HashMap<String, V>,
    default: V,
}

impl<V: Clone> MappingTable<V> {
    pub fn new(default: V) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    pub fn insert(&mut self, source: &str, value: V) {
        self.entries.insert(normalize(source), value);
    }

    pub fn classify(&self, source: &str) -> V {
        self.entries
            .get(&normalize(source))
            .unwrap_or(&self.default)
            .clone()
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Build the outage impact table from configured rows.
///
/// Unmapped source values land in `Degraded`. A row whose dashboard value
/// isn't a known impact level is skipped.
pub fn impact_table(rows: &[ImpactMapping]) -> MappingTable<ImpactLevel> {
    rows.iter()
        .fold(MappingTable::new(ImpactLevel::Degraded), |mut table, row| {
            match row.dashboard_value.trim().parse::<ImpactLevel>() {
                Ok(level) => table.insert(&row.servicenow_value, level),
                Err(_) => warn!(
                    source = %row.servicenow_value,
                    target = %row.dashboard_value,
                    "ignoring impact mapping with unknown dashboard value"
                ),
            }
            table
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, target: &str) -> ImpactMapping {
        ImpactMapping {
            servicenow_value: source.into(),
            dashboard_value: target.into(),
        }
    }

    #[test]
    fn classification_ignores_case_and_whitespace() {
        let table = impact_table(&[row("Outage", "SEV1"), row(" degradation ", "Degradation")]);
        assert_eq!(table.classify("  OUTAGE "), ImpactLevel::Sev1);
        assert_eq!(table.classify("Degradation"), ImpactLevel::Degraded);
    }

    #[test]
    fn unmapped_values_use_default_bucket() {
        let table = impact_table(&[row("outage", "SEV1")]);
        assert_eq!(table.classify("planned"), ImpactLevel::Degraded);
        assert_eq!(table.classify(""), ImpactLevel::Degraded);
    }

    #[test]
    fn unknown_dashboard_values_are_skipped() {
        let table = impact_table(&[row("outage", "SEV9"), row("partial", "sev3")]);
        assert_eq!(table.classify("outage"), ImpactLevel::Degraded);
        assert_eq!(table.classify("partial"), ImpactLevel::Sev3);
    }

    #[test]
    fn generic_tables() {
        let mut table = MappingTable::new("other");
        table.insert("A", "first");
        assert_eq!(table.classify("a"), "first");
        assert_eq!(table.classify("b"), "other");
    }
}
