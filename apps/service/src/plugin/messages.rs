//! Parameters `lightningd` sends to the plugin.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

/// Parameters of the `init` call
#[derive(Debug, Clone, Deserialize)]
pub struct InitParams {
    /// Option values as set on the node, keyed by option name
    #[serde(default)]
    pub options: HashMap<String, Value>,

    pub configuration: NodeConfiguration,
}

impl InitParams {
    /// Option value as text, whatever JSON type the node used
    pub fn option(&self, name: &str) -> Option<String> {
        match self.options.get(name)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeConfiguration {
    pub lightning_dir: PathBuf,
    pub rpc_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_params() {
        let params: InitParams = serde_json::from_value(json!({
            "options": { "sitzprobe-freq": "15", "sitzprobe-amt": 1000, "other": null },
            "configuration": {
                "lightning-dir": "/home/ln/.lightning/regtest",
                "rpc-file": "lightning-rpc",
                "startup": true,
                "network": "regtest"
            }
        }))
        .unwrap();

        assert_eq!(params.option("sitzprobe-freq").as_deref(), Some("15"));
        assert_eq!(params.option("sitzprobe-amt").as_deref(), Some("1000"));
        assert_eq!(params.option("other"), None);
        assert_eq!(params.option("missing"), None);
        assert_eq!(params.configuration.rpc_file, PathBuf::from("lightning-rpc"));
    }
}
