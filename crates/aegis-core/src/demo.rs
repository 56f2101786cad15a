// ── Demo datasets ──
//
// Fixed synthetic data served when demo mode is on. Timestamps are relative
// to the supplied `now` so the dashboard always looks live.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};

use crate::model::{
    AlertSeverity, Eta, ImpactLevel, MonitoringAlert, Outage, ScheduledChange, ServiceNowTicket,
    VendorHealth, VendorStatus,
};

const BRIDGE_URL: &str = "https://teams.microsoft.com/l/meetup-join/...";

fn outage(
    id: &str,
    system: &str,
    impact: ImpactLevel,
    start: DateTime<Utc>,
    eta: DateTime<Utc>,
    bridge: bool,
    description: &str,
) -> Outage {
    Outage {
        id: id.into(),
        system_name: system.into(),
        impact_level: impact,
        start_time: start,
        eta: Eta::At(eta),
        description: description.into(),
        teams_bridge_url: bridge.then(|| BRIDGE_URL.to_owned()),
    }
}

pub fn outages(now: DateTime<Utc>) -> Vec<Outage> {
    let minutes = TimeDelta::minutes;
    let hours = TimeDelta::hours;
    vec![
        outage(
            "outage-001",
            "API Gateway (Prod-US-East-1)",
            ImpactLevel::Sev1,
            now - minutes(15),
            now + hours(1),
            true,
            "Experiencing intermittent 5xx errors. Engineering is investigating.",
        ),
        outage(
            "outage-002",
            "Customer Authentication Service",
            ImpactLevel::Sev2,
            now - minutes(45),
            now + hours(2),
            true,
            "Increased latency on login and token refresh endpoints.",
        ),
        outage(
            "outage-003",
            "Internal Citrix VDI",
            ImpactLevel::Degraded,
            now - minutes(120),
            now + hours(4),
            false,
            "Users reporting slow application load times. Root cause analysis in progress.",
        ),
        outage(
            "outage-004",
            "Billing Processor Queue",
            ImpactLevel::Sev3,
            now - minutes(25),
            now + hours(1),
            false,
            "Message processing is delayed. No data loss expected.",
        ),
    ]
}

/// Today's outages followed by a week of resolved ones.
pub fn history(now: DateTime<Utc>) -> Vec<Outage> {
    let past = [
        ("hist-01", "Data Pipeline", ImpactLevel::Sev2, 1),
        ("hist-02", "Reporting Service", ImpactLevel::Sev3, 1),
        ("hist-03", "Internal DNS", ImpactLevel::Sev1, 2),
        ("hist-04", "VPN Concentrator", ImpactLevel::Degraded, 3),
        ("hist-05", "CI/CD Platform", ImpactLevel::Sev3, 3),
        ("hist-06", "Object Storage (EU)", ImpactLevel::Sev2, 5),
        ("hist-07", "Object Storage (EU)", ImpactLevel::Sev3, 5),
        ("hist-08", "API Gateway (Prod-EU-West-1)", ImpactLevel::Sev1, 6),
    ];
    let mut all = outages(now);
    all.extend(past.into_iter().map(|(id, system, impact, days_ago)| {
        let at = now - TimeDelta::days(days_ago);
        outage(id, system, impact, at, at, false, "")
    }));
    all
}

pub fn alerts(now: DateTime<Utc>) -> Vec<MonitoringAlert> {
    let rows = [
        ("alert-01", "High CPU Utilization", "kube-cluster-prod-us-east-1", TimeDelta::minutes(2), AlertSeverity::Critical, true),
        ("alert-02", "Disk Space Low", "db-primary-prod-us-west-2", TimeDelta::minutes(10), AlertSeverity::Warning, true),
        ("alert-03", "Pod CrashLoopBackOff", "auth-service-pod-xyz123", TimeDelta::minutes(12), AlertSeverity::Critical, false),
        ("alert-04", "Network Latency", "api-gateway-prod-eu-central-1", TimeDelta::minutes(30), AlertSeverity::Info, true),
        ("alert-05", "SSL Certificate Expiring", "portal.example.com", TimeDelta::hours(2), AlertSeverity::Warning, false),
    ];
    rows.into_iter()
        .map(|(id, title, system, age, severity, validated)| MonitoringAlert {
            id: id.into(),
            title: title.into(),
            affected_system: system.into(),
            timestamp: now - age,
            severity,
            validated,
            node_caption: String::new(),
            issue: title.into(),
        })
        .collect()
}

pub fn tickets() -> Vec<ServiceNowTicket> {
    let rows = [
        ("INC001001", "API Gateway 5xx errors in prod", "API Gateway (Prod-US-East-1)", "In Progress", "NetOps"),
        ("INC001002", "Users reporting slow login times", "Customer Authentication Service", "In Progress", "AppDev-Auth"),
        ("INC001003", "Citrix VDI performance degradation", "Internal Citrix VDI", "New", "Desktop Support"),
        ("INC001004", "Investigate high CPU on kube cluster", "kube-cluster-prod-us-east-1", "On Hold", "SRE"),
    ];
    rows.into_iter()
        .map(|(id, summary, ci, status, team)| ServiceNowTicket {
            id: id.into(),
            summary: summary.into(),
            affected_ci: ci.into(),
            status: status.into(),
            assigned_team: team.into(),
            ticket_url: "#".into(),
        })
        .collect()
}

/// Two changes in today's window (UTC).
pub fn changes(now: DateTime<Utc>) -> Vec<ScheduledChange> {
    let today = now.date_naive();
    let at = |h: u32, m: u32| {
        NaiveTime::from_hms_opt(h, m, 0).map(|t| today.and_time(t).and_utc())
    };
    let change = |number: &str, summary: &str, offering: &str, state: &str, kind: &str, start, end| {
        ScheduledChange {
            id: number.into(),
            number: number.into(),
            offering: offering.into(),
            title: summary.into(),
            summary: summary.into(),
            state: state.into(),
            change_type: kind.into(),
            start,
            end,
            url: "#".into(),
        }
    };
    vec![
        change(
            "CHG001234",
            "Database patching for auth cluster",
            "Customer Authentication Service",
            "Scheduled",
            "Standard",
            at(9, 0),
            at(11, 0),
        ),
        change(
            "CHG001235",
            "Edge cache rollout",
            "API Gateway (Prod-US-East-1)",
            "Implement",
            "Emergency",
            at(13, 30),
            at(15, 0),
        ),
    ]
}

pub fn vendors() -> Vec<VendorStatus> {
    let rows = [
        ("vendor-aws", "AWS", "https://status.aws.amazon.com/", VendorHealth::Operational),
        ("vendor-github", "GitHub", "https://www.githubstatus.com/", VendorHealth::Degraded),
        ("vendor-stripe", "Stripe", "https://status.stripe.com/", VendorHealth::Operational),
        ("vendor-slack", "Slack", "https://status.slack.com/", VendorHealth::Outage),
    ];
    rows.into_iter()
        .map(|(id, name, url, status)| VendorStatus {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            status,
        })
        .collect()
}
