use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::{self, RUNS_STARTED, SUCCESS};

/// Format of `started_at` in reports: ISO-8601 with a numeric UTC offset
pub const STARTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Point-in-time copy of the report state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub counters: BTreeMap<String, u64>,
    pub interval_minutes: u64,
    pub amount_msat: u64,
    pub started_at: DateTime<Utc>,
}

impl ReportSnapshot {
    pub fn count(&self, symbol: &str) -> u64 {
        self.counters.get(symbol).copied().unwrap_or(0)
    }

    pub fn runs(&self) -> u64 {
        self.count(RUNS_STARTED)
    }

    pub fn successes(&self) -> u64 {
        self.count(SUCCESS)
    }

    pub fn failures(&self) -> u64 {
        self.counters
            .iter()
            .filter(|(symbol, _)| outcome::is_failure_symbol(symbol))
            .map(|(_, count)| count)
            .sum()
    }
}

/// Response of the `sitzprobe-report` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    /// Probe interval, e.g. `every 60 min`
    pub frequency: String,

    /// When the agent started probing
    pub started_at: String,

    pub runs: u64,
    pub successes: u64,
    pub failures: u64,

    /// Count for every outcome seen so far, `runs_started` included
    pub stats: BTreeMap<String, u64>,
}

impl From<&ReportSnapshot> for ReportResult {
    fn from(snapshot: &ReportSnapshot) -> Self {
        Self {
            frequency: format!("every {} min", snapshot.interval_minutes),
            started_at: snapshot.started_at.format(STARTED_AT_FORMAT).to_string(),
            runs: snapshot.runs(),
            successes: snapshot.successes(),
            failures: snapshot.failures(),
            stats: snapshot.counters.clone(),
        }
    }
}
