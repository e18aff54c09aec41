//! Probe configuration methods.

use tracing::warn;

use super::types::{
    ConfigError, DEFAULT_AMOUNT_MSAT, DEFAULT_INTERVAL_MINUTES, ProbeConfig, ProbeConfigBuilder,
};

/// Parse a probe interval in minutes. Zero, negative and non-numeric values
/// are rejected.
pub fn parse_interval(raw: &str) -> Result<u64, ConfigError> {
    let minutes: i64 =
        raw.trim().parse().map_err(|_| ConfigError::InvalidInterval(raw.to_string()))?;
    if minutes <= 0 {
        return Err(ConfigError::InvalidInterval(raw.to_string()));
    }
    Ok(minutes as u64)
}

/// Parse a probe amount in millisatoshis.
pub fn parse_amount(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidAmount(raw.to_string()))
}

impl ProbeConfig {
    /// Build a configuration from raw option strings.
    ///
    /// Missing values take their default silently; invalid values take their
    /// default with a warning.
    pub fn from_options(interval: Option<&str>, amount: Option<&str>) -> Self {
        let interval_minutes = match interval.map(parse_interval) {
            None => DEFAULT_INTERVAL_MINUTES,
            Some(Ok(minutes)) => minutes,
            Some(Err(e)) => {
                warn!("{e}, defaulting to {DEFAULT_INTERVAL_MINUTES}");
                DEFAULT_INTERVAL_MINUTES
            }
        };

        let amount_msat = match amount.map(parse_amount) {
            None => DEFAULT_AMOUNT_MSAT,
            Some(Ok(amount)) => amount,
            Some(Err(e)) => {
                warn!("{e}, defaulting to {DEFAULT_AMOUNT_MSAT}");
                DEFAULT_AMOUNT_MSAT
            }
        };

        Self::builder().interval_minutes(interval_minutes).amount_msat(amount_msat).build()
    }

    /// Human readable interval, as shown in reports
    pub fn frequency(&self) -> String {
        format!("every {} min", self.interval_minutes)
    }
}

impl ProbeConfigBuilder {
    /// Build the configuration
    pub fn build(self) -> ProbeConfig {
        self.config
    }

    /// Set the interval between cycles, in minutes
    pub fn interval_minutes(mut self, minutes: u64) -> Self {
        self.config.interval_minutes = minutes;
        self
    }

    /// Set the probe amount, in millisatoshis
    pub fn amount_msat(mut self, amount: u64) -> Self {
        self.config.amount_msat = amount;
        self
    }

    /// Set the longest route to request
    pub fn max_hops(mut self, hops: u32) -> Self {
        self.config.max_hops = hops;
        self
    }

    /// Set how many random draws the channel selector may make
    pub fn max_draws(mut self, draws: usize) -> Self {
        self.config.max_draws = draws;
        self
    }
}
