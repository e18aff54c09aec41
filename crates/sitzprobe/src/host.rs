//! Interface to the Lightning node being probed.
//!
//! The engine only needs four calls from the node. [`NodeRpc`] is the seam
//! between the probe engine and whatever transport reaches the node; the
//! production implementation is [`crate::rpc::LightningRpc`].

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors returned by node calls
#[derive(Debug, Error)]
pub enum RpcError {
    /// The node answered with a JSON-RPC error object
    #[error("{message}")]
    Rpc { code: i64, message: String },

    /// The socket could not be reached or broke mid-call
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The node answered with something we could not decode
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RpcError {
    /// Failure text as reported by the node
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

/// A channel known to the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Node id the channel starts from
    #[serde(default)]
    pub source: String,

    /// Node id at the far end of the channel
    pub destination: String,

    #[serde(default)]
    pub short_channel_id: String,

    /// Whether the channel can currently carry payments
    pub active: bool,
}

impl Channel {
    pub fn new(destination: impl Into<String>, active: bool) -> Self {
        Self {
            source: String::new(),
            destination: destination.into(),
            short_channel_id: String::new(),
            active,
        }
    }
}

/// One hop of a route, as returned by `getroute` and accepted by `sendpay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHop {
    /// Node id of the hop
    pub id: String,

    /// Short channel id used to reach the hop
    pub channel: String,

    pub direction: u8,

    /// Amount to forward, in millisatoshis
    #[serde(deserialize_with = "deserialize_msat")]
    pub amount_msat: u64,

    /// CLTV delay at this hop
    pub delay: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// An ordered path from our node to a destination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    pub hops: Vec<RouteHop>,
}

impl Route {
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Node id of the final hop
    pub fn destination(&self) -> Option<&str> {
        self.hops.last().map(|hop| hop.id.as_str())
    }
}

/// Returned by `waitsendpay` when a payment settles
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentSuccess {
    #[serde(default)]
    pub destination: String,
}

/// Calls the probe engine makes against the node
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// List every channel the node knows about
    async fn list_channels(&self) -> Result<Vec<Channel>, RpcError>;

    /// Ask the node for a route carrying `amount_msat` to `destination`
    async fn get_route(
        &self,
        destination: &str,
        amount_msat: u64,
        max_hops: u32,
    ) -> Result<Route, RpcError>;

    /// Submit a payment along `route`
    async fn send_pay(&self, route: &Route, payment_hash: &str) -> Result<(), RpcError>;

    /// Block until the payment identified by `payment_hash` resolves.
    ///
    /// A failed payment comes back as an `Err` carrying the node's message.
    async fn wait_send_pay(&self, payment_hash: &str) -> Result<PaymentSuccess, RpcError>;
}

/// Older nodes report amounts as `"1000msat"` strings, newer ones as numbers.
fn deserialize_msat<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Msat {
        Number(u64),
        Text(String),
    }

    match Msat::deserialize(deserializer)? {
        Msat::Number(value) => Ok(value),
        Msat::Text(text) => text
            .trim_end_matches("msat")
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid msat amount: {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_hop_accepts_both_amount_forms() {
        let hops: Vec<RouteHop> = serde_json::from_value(json!([
            { "id": "02aa", "channel": "1x2x3", "direction": 0, "amount_msat": 1001, "delay": 15 },
            { "id": "03bb", "channel": "4x5x6", "direction": 1, "amount_msat": "1000msat", "delay": 9, "style": "tlv" }
        ]))
        .unwrap();

        assert_eq!(hops[0].amount_msat, 1001);
        assert_eq!(hops[1].amount_msat, 1000);
        assert_eq!(hops[1].style.as_deref(), Some("tlv"));
    }

    #[test]
    fn test_channel_ignores_extra_fields() {
        let channel: Channel = serde_json::from_value(json!({
            "source": "02aa",
            "destination": "03bb",
            "short_channel_id": "1x2x3",
            "public": true,
            "active": false,
            "base_fee_millisatoshi": 1
        }))
        .unwrap();

        assert_eq!(channel.destination, "03bb");
        assert!(!channel.active);
    }

    #[test]
    fn test_rpc_error_message_is_node_text() {
        let err = RpcError::Rpc {
            code: 204,
            message: "failed: WIRE_TEMPORARY_CHANNEL_FAILURE (reply from remote)".to_string(),
        };
        assert_eq!(err.message(), "failed: WIRE_TEMPORARY_CHANNEL_FAILURE (reply from remote)");
    }
}
