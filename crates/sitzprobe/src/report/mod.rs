//! Report aggregation for Sitzprobe.
//!
//! This module keeps the per-outcome counters written by the scheduler and
//! builds the views handed out to the report query.

pub mod aggregator;
pub mod snapshot;

pub use aggregator::ReportAggregator;
pub use snapshot::{ReportResult, ReportSnapshot, STARTED_AT_FORMAT};
