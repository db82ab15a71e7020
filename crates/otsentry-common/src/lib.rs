pub mod types;

pub use types::{
    ClassifiedThreat, Severity, SeverityBreakdown, ThreatEntry, ThreatReport, VulnerabilityRecord,
};
