// ── Vendor status domain types ──

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Health derived from a vendor's status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorHealth {
    Outage,
    Degraded,
    Operational,
}

impl VendorHealth {
    /// Sort rank: worst first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Outage => 0,
            Self::Degraded => 1,
            Self::Operational => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorStatus {
    pub id: String,
    pub name: String,
    pub url: String,
    pub status: VendorHealth,
}

impl VendorStatus {
    /// Dashboard ordering: health rank, then case-insensitive name.
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.status
            .rank()
            .cmp(&other.status.rank())
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
    }
}
