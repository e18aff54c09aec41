use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::snapshot::{ReportResult, ReportSnapshot};
use crate::config::ProbeConfig;
use crate::outcome::{self, Outcome};

/// Running tally of probe outcomes for the lifetime of the process.
///
/// The scheduler is the only writer. Readers take a [`ReportSnapshot`], which
/// holds the lock just long enough to copy the counters.
#[derive(Debug)]
pub struct ReportAggregator {
    counters: Mutex<BTreeMap<String, u64>>,
    interval_minutes: u64,
    amount_msat: u64,
    started_at: DateTime<Utc>,
}

impl ReportAggregator {
    /// Create an empty report, started now
    pub fn new(config: &ProbeConfig) -> Self {
        Self::with_start_time(config, Utc::now())
    }

    pub fn with_start_time(config: &ProbeConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            interval_minutes: config.interval_minutes,
            amount_msat: config.amount_msat,
            started_at,
        }
    }

    fn counters(&self) -> MutexGuard<'_, BTreeMap<String, u64>> {
        // A panic while holding the lock cannot leave a half-written counter
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one occurrence of `outcome`, returning the new count
    pub fn increment(&self, outcome: &Outcome) -> u64 {
        let mut counters = self.counters();
        let count = counters.entry(outcome.as_str().to_string()).or_insert(0);
        *count += 1;
        debug!(outcome = %outcome, count = *count, "Recorded probe outcome");
        *count
    }

    /// Current count for a symbol, zero if never seen
    pub fn count(&self, symbol: &str) -> u64 {
        self.counters().get(symbol).copied().unwrap_or(0)
    }

    /// Sum of every counter except `success` and `runs_started`
    pub fn failures(&self) -> u64 {
        self.counters()
            .iter()
            .filter(|(symbol, _)| outcome::is_failure_symbol(symbol))
            .map(|(_, count)| count)
            .sum()
    }

    /// Copy of the current counters and configuration
    pub fn snapshot(&self) -> ReportSnapshot {
        let counters = self.counters().clone();
        ReportSnapshot {
            counters,
            interval_minutes: self.interval_minutes,
            amount_msat: self.amount_msat,
            started_at: self.started_at,
        }
    }

    /// Report as returned to operators
    pub fn report(&self) -> ReportResult {
        ReportResult::from(&self.snapshot())
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
