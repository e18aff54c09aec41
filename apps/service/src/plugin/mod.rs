//! Plugin module - speaks the `lightningd` plugin protocol
//!
//! The node starts the plugin and talks JSON-RPC to it over stdin/stdout:
//! - `getmanifest`: options and methods the plugin offers
//! - `init`: option values and the node's RPC socket; probing starts here
//! - `sitzprobe-report`: the running probe report

pub mod manifest;
pub mod messages;

pub use manifest::Manifest;

use std::sync::Arc;

use anyhow::Result;
use serde_json::{Value, json};
use sitzprobe::rpc::jsonrpc::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};
use sitzprobe::rpc::{JsonReader, Request, Response, write_message};
use sitzprobe::{
    LightningRpc, NodeRpc, ProbeConfig, ProbeScheduler, REPORT_METHOD, ReportAggregator,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use manifest::{AMOUNT_OPTION, FREQUENCY_OPTION};
use messages::{InitParams, NodeConfiguration};

/// Builds the node client once `init` says where the node is
pub type NodeFactory = Box<dyn Fn(&NodeConfiguration) -> Arc<dyn NodeRpc> + Send + Sync>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(#[source] serde_json::Error),

    #[error("Failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("sitzprobe has not been initialized yet")]
    NotInitialized,

    #[error("sitzprobe is already initialized")]
    AlreadyInitialized,
}

impl PluginError {
    pub fn code(&self) -> i64 {
        match self {
            PluginError::MethodNotFound(_) => METHOD_NOT_FOUND,
            PluginError::InvalidParams(_) => INVALID_PARAMS,
            PluginError::Encode(_) | PluginError::NotInitialized | PluginError::AlreadyInitialized => {
                INVALID_REQUEST
            }
        }
    }
}

/// Probing state, present once `init` ran
struct Running {
    report: Arc<ReportAggregator>,
    _scheduler: JoinHandle<()>,
}

pub struct Plugin {
    connect: NodeFactory,
    running: Option<Running>,
}

impl Default for Plugin {
    fn default() -> Self {
        Self::with_node_factory(Box::new(|config: &NodeConfiguration| {
            Arc::new(LightningRpc::from_config(&config.lightning_dir, &config.rpc_file))
        }))
    }
}

impl Plugin {
    pub fn with_node_factory(connect: NodeFactory) -> Self {
        Self { connect, running: None }
    }

    /// Answer one request from the node
    pub fn handle(&mut self, request: &Request) -> Result<Value, PluginError> {
        match request.method.as_str() {
            "getmanifest" => serde_json::to_value(Manifest::default()).map_err(PluginError::Encode),
            "init" => {
                let params: InitParams = serde_json::from_value(request.params.clone())
                    .map_err(PluginError::InvalidParams)?;
                self.init(params)
            }
            REPORT_METHOD => self.report(),
            other => Err(PluginError::MethodNotFound(other.to_string())),
        }
    }

    fn init(&mut self, params: InitParams) -> Result<Value, PluginError> {
        if self.running.is_some() {
            return Err(PluginError::AlreadyInitialized);
        }

        let frequency = params.option(FREQUENCY_OPTION);
        let amount = params.option(AMOUNT_OPTION);
        let config = ProbeConfig::from_options(frequency.as_deref(), amount.as_deref());

        let node = (self.connect)(&params.configuration);
        let report = Arc::new(ReportAggregator::new(&config));
        info!(
            lightning_dir = %params.configuration.lightning_dir.display(),
            "Probing {} with {} msat",
            config.frequency(),
            config.amount_msat
        );

        let scheduler = ProbeScheduler::new(node, report.clone(), &config).spawn();
        self.running = Some(Running { report, _scheduler: scheduler });
        Ok(json!({}))
    }

    fn report(&self) -> Result<Value, PluginError> {
        let running = self.running.as_ref().ok_or(PluginError::NotInitialized)?;
        serde_json::to_value(running.report.report()).map_err(PluginError::Encode)
    }

    /// Serve requests from `reader` until the node closes it
    pub async fn run<R, W>(mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = JsonReader::new(reader);

        while let Some(message) = reader.next_message().await? {
            let request: Request = match serde_json::from_value(message) {
                Ok(request) => request,
                Err(e) => {
                    warn!("Ignoring malformed message from lightningd: {}", e);
                    continue;
                }
            };

            let Some(id) = request.id.clone() else {
                debug!(method = %request.method, "Ignoring notification");
                continue;
            };

            let response = match self.handle(&request) {
                Ok(result) => Response::success(id, result),
                Err(e) => {
                    warn!(method = %request.method, "{}", e);
                    Response::error(id, e.code(), e.to_string())
                }
            };
            write_message(&mut writer, &response).await?;
        }

        info!("lightningd closed the plugin channel, shutting down");
        Ok(())
    }
}
