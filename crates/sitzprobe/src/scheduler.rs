//! Probe scheduler - runs probe cycles back to back, forever.
//!
//! Each cycle picks a target, probes it and records exactly one outcome on
//! top of `runs_started`. The next cycle starts one interval after the
//! previous one finished, so cycles never overlap. A cycle that fails is
//! logged and counted; it never stops the scheduler.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::classifier::classify;
use crate::config::ProbeConfig;
use crate::dispatcher::{PaymentStatus, ProbeDispatcher};
use crate::host::NodeRpc;
use crate::outcome::Outcome;
use crate::report::ReportAggregator;
use crate::selector::ChannelSelector;

pub struct ProbeScheduler {
    node: Arc<dyn NodeRpc>,
    dispatcher: ProbeDispatcher,
    selector: ChannelSelector,
    report: Arc<ReportAggregator>,
    interval: Duration,
    rng: StdRng,
    cycle: u64,
}

impl ProbeScheduler {
    /// Create a new scheduler recording into `report`
    pub fn new(node: Arc<dyn NodeRpc>, report: Arc<ReportAggregator>, config: &ProbeConfig) -> Self {
        Self {
            dispatcher: ProbeDispatcher::new(node.clone(), config),
            node,
            selector: ChannelSelector::new(config.max_draws),
            report,
            interval: config.interval(),
            rng: StdRng::from_entropy(),
            cycle: 0,
        }
    }

    /// Replace the random source used for target selection and payment hashes
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Number of the most recently started cycle, zero before the first one
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn report(&self) -> Arc<ReportAggregator> {
        self.report.clone()
    }

    /// Run one probe cycle and return the outcome it recorded
    pub async fn run_cycle(&mut self) -> Outcome {
        self.cycle += 1;
        let cycle = self.cycle;
        self.report.increment(&Outcome::RUNS_STARTED);

        let outcome = self.probe_once(cycle).await;
        self.report.increment(&outcome);
        outcome
    }

    async fn probe_once(&mut self, cycle: u64) -> Outcome {
        let channels = match self.node.list_channels().await {
            Ok(channels) => channels,
            Err(e) => {
                warn!(cycle, "Unable to fetch channel list: {}", e);
                return Outcome::CHANNELS_UNAVAILABLE;
            }
        };

        let Some(channel) = self.selector.select(&channels, &mut self.rng) else {
            warn!(cycle, "Unable to find active channel out of {} channels", channels.len());
            return Outcome::NO_ACTIVE_CHANNEL_FOUND;
        };
        let destination = channel.destination.clone();

        match self.dispatcher.probe(&destination, &mut self.rng).await {
            Err(e) => {
                warn!(cycle, "{}", e);
                e.outcome()
            }
            Ok(PaymentStatus::Failed { message }) => {
                let outcome = classify(&message);
                info!(cycle, outcome = %outcome, "Payment successfully failed: {}", message);
                outcome
            }
            Ok(PaymentStatus::Complete { destination }) => {
                warn!(cycle, "Payment unexpectedly succeeded, peer {} reached", destination);
                Outcome::SUCCESS
            }
        }
    }

    /// Run cycles forever, sleeping the configured interval between them.
    ///
    /// The first cycle starts immediately.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            max_draws = self.selector.max_draws(),
            "Starting probe scheduler"
        );

        loop {
            let outcome = self.run_cycle().await;
            info!(cycle = self.cycle, outcome = %outcome, "Probe cycle finished");
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run the scheduler on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
