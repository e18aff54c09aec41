//! Sitzprobe - probe agent for Lightning nodes
//!
//! Periodically sends payments that are built to fail at their destination,
//! and counts how each one failed. The counters give a running picture of
//! whether the node can still find routes and push HTLCs through them.

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod host;
pub mod outcome;
pub mod report;
pub mod rpc;
pub mod scheduler;
pub mod selector;

// Re-export main types
pub use classifier::classify;
pub use config::{ProbeConfig, ProbeConfigBuilder};
pub use dispatcher::{DispatchError, PaymentStatus, ProbeAttempt, ProbeDispatcher};
pub use host::{Channel, NodeRpc, PaymentSuccess, Route, RouteHop, RpcError};
pub use outcome::Outcome;
pub use report::{ReportAggregator, ReportResult, ReportSnapshot};
pub use rpc::LightningRpc;
pub use scheduler::ProbeScheduler;
pub use selector::ChannelSelector;

/// Name of the report query method exposed to operators
pub const REPORT_METHOD: &str = "sitzprobe-report";
