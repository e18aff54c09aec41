//! Probe configuration for Sitzprobe.
//!
//! This module defines the interval and amount the scheduler probes with,
//! and how raw option strings from the node are turned into them.

mod methods;
mod types;

pub use methods::{parse_amount, parse_interval};
pub use types::{
    ConfigError, DEFAULT_AMOUNT_MSAT, DEFAULT_INTERVAL_MINUTES, DEFAULT_MAX_HOPS,
    ProbeConfig, ProbeConfigBuilder,
};
