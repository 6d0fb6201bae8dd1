use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Validation,
    Deployment,
    Peering,
    EnforcedOptions,
    Bridge,
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validation => "validation",
            Phase::Deployment => "deployment",
            Phase::Peering => "peering",
            Phase::EnforcedOptions => "enforced_options",
            Phase::Bridge => "bridge",
            Phase::Report => "report",
        };
        f.write_str(name)
    }
}

/// One step of a workflow trace, returned to the caller for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    pub message: String,
}
