//! What the plugin tells `lightningd` about itself in `getmanifest`.

use serde::Serialize;
use sitzprobe::REPORT_METHOD;
use sitzprobe::config::{DEFAULT_AMOUNT_MSAT, DEFAULT_INTERVAL_MINUTES};

/// Option holding the probe interval, in minutes
pub const FREQUENCY_OPTION: &str = "sitzprobe-freq";

/// Option holding the probe amount, in millisatoshis
pub const AMOUNT_OPTION: &str = "sitzprobe-amt";

#[derive(Debug, Clone, Serialize)]
pub struct PluginOption {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub default: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcMethod {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub long_description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub options: Vec<PluginOption>,
    pub rpcmethods: Vec<RpcMethod>,
    pub subscriptions: Vec<String>,
    pub hooks: Vec<String>,
    pub dynamic: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            options: vec![
                PluginOption {
                    name: FREQUENCY_OPTION,
                    kind: "string",
                    default: DEFAULT_INTERVAL_MINUTES.to_string(),
                    description: "Interval to run sitzprobe on, in minutes",
                },
                PluginOption {
                    name: AMOUNT_OPTION,
                    kind: "string",
                    default: DEFAULT_AMOUNT_MSAT.to_string(),
                    description: "Amount to probe with, in millisatoshis",
                },
            ],
            rpcmethods: vec![RpcMethod {
                name: REPORT_METHOD,
                usage: "",
                description: "Print a probe report",
                long_description: "Returns a set of metrics around probes, including failures \
                                   and successes",
            }],
            subscriptions: Vec::new(),
            hooks: Vec::new(),
            dynamic: false,
        }
    }
}
