//! Probe configuration types.

use std::time::Duration;

use thiserror::Error;

use crate::selector::DEFAULT_MAX_DRAWS;

/// Minutes between two probe cycles when none is configured
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

/// Probe amount in millisatoshis when none is configured
pub const DEFAULT_AMOUNT_MSAT: u64 = 1;

/// Longest route the node is asked for
pub const DEFAULT_MAX_HOPS: u32 = 5;

/// Rejected option values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid frequency set ({0})")]
    InvalidInterval(String),

    #[error("Invalid amount set ({0})")]
    InvalidAmount(String),
}

/// Configuration for the probe scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Minutes to wait between the end of one cycle and the start of the next
    pub interval_minutes: u64,

    /// Amount every probe carries, in millisatoshis
    pub amount_msat: u64,

    /// Maximum route length requested from the node
    pub max_hops: u32,

    /// Random draws the channel selector makes before giving up
    pub max_draws: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            amount_msat: DEFAULT_AMOUNT_MSAT,
            max_hops: DEFAULT_MAX_HOPS,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

impl ProbeConfig {
    /// Create a new configuration builder
    pub fn builder() -> ProbeConfigBuilder {
        ProbeConfigBuilder::default()
    }

    /// Delay between cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

/// Builder for ProbeConfig
#[derive(Debug, Default)]
pub struct ProbeConfigBuilder {
    pub(crate) config: ProbeConfig,
}
