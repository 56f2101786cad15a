// ── Canonical dashboard model ──
//
// Every type here is produced fresh per request from an upstream record and
// the active integration config, and serialized camelCase for the
// dashboard. Nothing holds a reference back to its configuration.

pub mod alert;
pub mod change;
pub mod outage;
pub mod ticket;
pub mod vendor;

pub use alert::{AlertSeverity, MonitoringAlert};
pub use change::ScheduledChange;
pub use outage::{Eta, ImpactLevel, Outage};
pub use ticket::ServiceNowTicket;
pub use vendor::{VendorHealth, VendorStatus};
