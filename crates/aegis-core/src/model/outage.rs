// ── Outage domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Dashboard impact bucket.
///
/// Configured lookup tables may spell the degraded bucket either
/// `Degraded` or `Degradation`; both parse to [`ImpactLevel::Degraded`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ImpactLevel {
    #[serde(rename = "SEV1")]
    #[strum(serialize = "SEV1")]
    Sev1,
    #[serde(rename = "SEV2")]
    #[strum(serialize = "SEV2")]
    Sev2,
    #[serde(rename = "SEV3")]
    #[strum(serialize = "SEV3")]
    Sev3,
    #[default]
    #[serde(alias = "Degradation")]
    #[strum(to_string = "Degraded", serialize = "Degradation")]
    Degraded,
}

/// Expected end of an outage: a concrete instant, or `"Unknown"` when the
/// source record has no end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    At(DateTime<Utc>),
    Unknown,
}

const UNKNOWN_ETA: &str = "Unknown";

impl Serialize for Eta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(at) => at.serialize(serializer),
            Self::Unknown => serializer.serialize_str(UNKNOWN_ETA),
        }
    }
}

impl<'de> Deserialize<'de> for Eta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == UNKNOWN_ETA {
            return Ok(Self::Unknown);
        }
        raw.parse::<DateTime<Utc>>()
            .map(Self::At)
            .map_err(serde::de::Error::custom)
    }
}

/// An ongoing or recent outage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outage {
    pub id: String,
    pub system_name: String,
    pub impact_level: ImpactLevel,
    pub start_time: DateTime<Utc>,
    pub eta: Eta,
    pub description: String,
    pub teams_bridge_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn degradation_alias_parses_to_degraded() {
        assert_eq!("Degradation".parse::<ImpactLevel>().ok(), Some(ImpactLevel::Degraded));
        assert_eq!("degraded".parse::<ImpactLevel>().ok(), Some(ImpactLevel::Degraded));
        assert_eq!("sev1".parse::<ImpactLevel>().ok(), Some(ImpactLevel::Sev1));
        assert!("SEV9".parse::<ImpactLevel>().is_err());
        assert_eq!(ImpactLevel::Degraded.to_string(), "Degraded");
    }

    #[test]
    fn impact_serializes_as_dashboard_label() {
        assert_eq!(serde_json::to_value(ImpactLevel::Sev2).ok(), Some(json!("SEV2")));
    }

    #[test]
    fn unknown_eta_is_a_sentinel_string() {
        assert_eq!(serde_json::to_value(Eta::Unknown).ok(), Some(json!("Unknown")));
        let parsed: Eta = serde_json::from_value(json!("Unknown")).expect("sentinel");
        assert_eq!(parsed, Eta::Unknown);

        let at: Eta = serde_json::from_value(json!("2024-05-01T10:00:00Z")).expect("instant");
        assert!(matches!(at, Eta::At(_)));
    }
}
