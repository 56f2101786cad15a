// ── Vendor status probing ──
//
// Each configured vendor is probed concurrently; one vendor's failure only
// affects its own row. Results come back worst-first.

use futures_util::future::join_all;
use tracing::{debug, warn};

use aegis_api::StatusPageClient;

use crate::config::{StatusType, VendorProbe};
use crate::model::{VendorHealth, VendorStatus};
use crate::resolve::FieldValue;

/// Lower-cased allow-list from a comma-separated expected-value string.
pub fn expected_values(raw: &str) -> Vec<String> {
    raw.split(',').map(|v| v.trim().to_lowercase()).collect()
}

/// Classify a resolved status value against the allow-list.
pub fn classify(value: &FieldValue, expected: &str) -> VendorHealth {
    let Some(actual) = value.as_str() else {
        return VendorHealth::Degraded;
    };
    let actual = actual.trim().to_lowercase();
    if expected_values(expected).contains(&actual) {
        VendorHealth::Operational
    } else {
        VendorHealth::Outage
    }
}

/// Order for display: Outage, Degraded, Operational; ties by name.
pub fn sort_statuses(statuses: &mut [VendorStatus]) {
    statuses.sort_by(VendorStatus::display_order);
}

#[derive(Clone)]
pub struct VendorProber {
    client: StatusPageClient,
}

impl VendorProber {
    pub fn new(client: StatusPageClient) -> Self {
        Self { client }
    }

    /// Probe one vendor. Never fails; problems degrade the vendor's health.
    pub async fn probe(&self, vendor: &VendorProbe) -> VendorStatus {
        VendorStatus {
            id: vendor.id.clone(),
            name: vendor.name.clone(),
            url: vendor.url.clone(),
            status: self.health(vendor).await,
        }
    }

    async fn health(&self, vendor: &VendorProbe) -> VendorHealth {
        let (StatusType::ApiJson, Some(api_url), Some(path), Some(expected)) = (
            vendor.status_type,
            non_blank(vendor.api_url.as_deref()),
            non_blank(vendor.json_path.as_deref()),
            non_blank(vendor.expected_value.as_deref()),
        ) else {
            return VendorHealth::Operational;
        };

        let fetched = match self.client.fetch(api_url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(vendor = %vendor.name, error = %e, "status page unreachable");
                return VendorHealth::Degraded;
            }
        };
        if !fetched.is_success() {
            debug!(vendor = %vendor.name, status = fetched.status.as_u16(), "status page returned an error");
            return VendorHealth::Degraded;
        }
        let Some(body) = &fetched.body else {
            debug!(vendor = %vendor.name, "status page body is not JSON");
            return VendorHealth::Degraded;
        };

        classify(&FieldValue::resolve(body, path), expected)
    }

    /// Probe every vendor concurrently and sort for display.
    pub async fn probe_all(&self, vendors: &[VendorProbe]) -> Vec<VendorStatus> {
        let mut statuses = join_all(vendors.iter().map(|v| self.probe(v))).await;
        sort_statuses(&mut statuses);
        statuses
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status(name: &str, health: VendorHealth) -> VendorStatus {
        VendorStatus {
            id: name.to_lowercase(),
            name: name.into(),
            url: String::new(),
            status: health,
        }
    }

    #[test]
    fn allow_list_is_case_insensitive_and_multi_valued() {
        let ok = FieldValue::resolve(&json!({ "s": "OK" }), "s");
        assert_eq!(classify(&ok, "green, ok"), VendorHealth::Operational);

        let red = FieldValue::resolve(&json!({ "s": "red" }), "s");
        assert_eq!(classify(&red, "green, ok"), VendorHealth::Outage);

        let missing = FieldValue::resolve(&json!({}), "s");
        assert_eq!(classify(&missing, "green"), VendorHealth::Degraded);
    }

    #[test]
    fn sorts_worst_first_then_by_name() {
        let mut statuses = vec![
            status("Zeta", VendorHealth::Operational),
            status("Alpha", VendorHealth::Outage),
            status("Beta", VendorHealth::Degraded),
            status("alpha2", VendorHealth::Outage),
        ];
        sort_statuses(&mut statuses);
        let names: Vec<_> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "alpha2", "Beta", "Zeta"]);
    }
}
