//! Sends one probe payment and waits for it to resolve.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::config::ProbeConfig;
use crate::host::{NodeRpc, Route, RpcError};
use crate::outcome::Outcome;

/// Ways a probe can end before the node reports a payment result
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unable to find route to node id {destination}: {source}")]
    NoRouteFound {
        destination: String,
        #[source]
        source: RpcError,
    },

    #[error("Unable to send payment along route: {0}")]
    SendPayFailed(#[source] RpcError),

    /// The payment result never arrived, so there is no failure to classify
    #[error("Unable to wait for payment result: {0}")]
    WaitSendPayFailed(#[source] RpcError),
}

impl DispatchError {
    /// Outcome recorded for this error
    pub fn outcome(&self) -> Outcome {
        match self {
            DispatchError::NoRouteFound { .. } => Outcome::NO_ROUTE_FOUND,
            DispatchError::SendPayFailed(_) => Outcome::SENDPAY_CALL_FAILED,
            DispatchError::WaitSendPayFailed(_) => Outcome::UNKNOWN_ERROR,
        }
    }
}

/// How the node resolved a submitted probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    /// The payment settled. Should never happen, since nobody knows the
    /// preimage of the hash we sent.
    Complete { destination: String },

    /// The payment failed; `message` is the node's raw failure text
    Failed { message: String },
}

/// A single probe payment in flight
#[derive(Debug, Clone)]
pub struct ProbeAttempt {
    /// Random hash the payment is sent under. Not derived from any preimage.
    pub payment_hash: String,
    pub destination: String,
    pub route: Route,
    pub amount_msat: u64,
}

impl ProbeAttempt {
    pub fn new<R: Rng>(destination: &str, route: Route, amount_msat: u64, rng: &mut R) -> Self {
        Self {
            payment_hash: random_payment_hash(rng),
            destination: destination.to_string(),
            route,
            amount_msat,
        }
    }
}

/// 32 random bytes, hex encoded
pub fn random_payment_hash<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    hex::encode(bytes)
}

/// Probe dispatcher - routes and sends individual probes
pub struct ProbeDispatcher {
    node: Arc<dyn NodeRpc>,
    amount_msat: u64,
    max_hops: u32,
}

impl ProbeDispatcher {
    /// Create a new dispatcher sending probes of the configured amount
    pub fn new(node: Arc<dyn NodeRpc>, config: &ProbeConfig) -> Self {
        Self { node, amount_msat: config.amount_msat, max_hops: config.max_hops }
    }

    /// Probe `destination`.
    ///
    /// Waits for the node to resolve the payment for as long as that takes.
    pub async fn probe<R: Rng + Send>(
        &self,
        destination: &str,
        rng: &mut R,
    ) -> Result<PaymentStatus, DispatchError> {
        let route = self
            .node
            .get_route(destination, self.amount_msat, self.max_hops)
            .await
            .map_err(|source| DispatchError::NoRouteFound {
                destination: destination.to_string(),
                source,
            })?;

        let attempt = ProbeAttempt::new(destination, route, self.amount_msat, rng);
        debug!(
            destination = %attempt.destination,
            hops = attempt.route.len(),
            payment_hash = %attempt.payment_hash,
            "Sending probe"
        );

        self.node
            .send_pay(&attempt.route, &attempt.payment_hash)
            .await
            .map_err(DispatchError::SendPayFailed)?;

        match self.node.wait_send_pay(&attempt.payment_hash).await {
            Ok(payment) => Ok(PaymentStatus::Complete { destination: payment.destination }),
            Err(RpcError::Rpc { message, .. }) => Ok(PaymentStatus::Failed { message }),
            Err(e) => Err(DispatchError::WaitSendPayFailed(e)),
        }
    }
}
