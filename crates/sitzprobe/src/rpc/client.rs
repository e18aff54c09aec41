use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::net::UnixStream;
use tracing::debug;

use super::jsonrpc::{JsonReader, Request, Response, write_message};
use crate::host::{Channel, NodeRpc, PaymentSuccess, Route, RpcError};

/// Risk factor passed to `getroute`
pub const ROUTE_RISK_FACTOR: u64 = 10;

#[derive(Deserialize)]
struct ListChannels {
    channels: Vec<Channel>,
}

#[derive(Deserialize)]
struct GetRoute {
    route: Route,
}

/// Client for the `lightningd` JSON-RPC socket.
///
/// Every call opens its own connection, so calls never wait on each other.
#[derive(Debug)]
pub struct LightningRpc {
    socket_path: PathBuf,
    next_id: AtomicU64,
}

impl LightningRpc {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self { socket_path: socket_path.into(), next_id: AtomicU64::new(1) }
    }

    /// Socket at `rpc_file`, relative to `lightning_dir` unless absolute
    pub fn from_config(lightning_dir: impl AsRef<Path>, rpc_file: impl AsRef<Path>) -> Self {
        Self::new(lightning_dir.as_ref().join(rpc_file))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Call `method` and decode its result as `T`
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(id, method, params);
        debug!(id, method, "Calling lightningd");

        let stream = UnixStream::connect(&self.socket_path).await?;
        let (read_half, mut write_half) = stream.into_split();
        write_message(&mut write_half, &request).await?;

        let mut reader = JsonReader::new(read_half);
        let response: Response = reader.next().await?.ok_or_else(|| {
            RpcError::Decode(format!("connection closed before {method} returned"))
        })?;

        let result = response.into_result()?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl NodeRpc for LightningRpc {
    async fn list_channels(&self) -> Result<Vec<Channel>, RpcError> {
        let list: ListChannels = self.call("listchannels", json!({})).await?;
        Ok(list.channels)
    }

    async fn get_route(
        &self,
        destination: &str,
        amount_msat: u64,
        max_hops: u32,
    ) -> Result<Route, RpcError> {
        let params = json!({
            "id": destination,
            "amount_msat": amount_msat,
            "riskfactor": ROUTE_RISK_FACTOR,
            "maxhops": max_hops,
        });
        let found: GetRoute = self.call("getroute", params).await?;
        Ok(found.route)
    }

    async fn send_pay(&self, route: &Route, payment_hash: &str) -> Result<(), RpcError> {
        let params = json!({ "route": route, "payment_hash": payment_hash });
        let _: Value = self.call("sendpay", params).await?;
        Ok(())
    }

    async fn wait_send_pay(&self, payment_hash: &str) -> Result<PaymentSuccess, RpcError> {
        self.call("waitsendpay", json!({ "payment_hash": payment_hash })).await
    }
}
