//! Scripted stand-in for a Lightning node

#![allow(dead_code)]

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sitzprobe::{Channel, NodeRpc, PaymentSuccess, Route, RouteHop, RpcError};

fn rpc_error(message: &str) -> RpcError {
    RpcError::Rpc { code: 204, message: message.to_string() }
}

pub fn route_to(destination: &str) -> Route {
    Route {
        hops: vec![RouteHop {
            id: destination.to_string(),
            channel: "103x1x0".to_string(),
            direction: 0,
            amount_msat: 1,
            delay: 9,
            style: Some("tlv".to_string()),
        }],
    }
}

pub struct MockNode {
    channels: Result<Vec<Channel>, String>,
    route_error: Option<String>,
    send_error: Option<String>,
    wait_result: Result<String, String>,
    wait_delay: Option<Duration>,
    wait_disconnects: bool,

    pub payment_hashes: Mutex<Vec<String>>,
    pub route_requests: Mutex<Vec<(String, u64, u32)>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockNode {
    /// Node with one active channel whose probes fail with `message`
    pub fn failing_with(message: &str) -> Self {
        Self {
            channels: Ok(vec![Channel::new("02target", true)]),
            route_error: None,
            send_error: None,
            wait_result: Err(message.to_string()),
            wait_delay: None,
            wait_disconnects: false,
            payment_hashes: Mutex::new(Vec::new()),
            route_requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_channels(mut self, channels: Vec<Channel>) -> Self {
        self.channels = Ok(channels);
        self
    }

    pub fn without_channel_list(mut self, message: &str) -> Self {
        self.channels = Err(message.to_string());
        self
    }

    pub fn without_route(mut self, message: &str) -> Self {
        self.route_error = Some(message.to_string());
        self
    }

    pub fn rejecting_payments(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_string());
        self
    }

    pub fn settling_payments(mut self) -> Self {
        self.wait_result = Ok("02target".to_string());
        self
    }

    /// Connection drops while waiting for the payment result
    pub fn disconnecting_on_wait(mut self) -> Self {
        self.wait_disconnects = true;
        self
    }

    pub fn resolving_after(mut self, delay: Duration) -> Self {
        self.wait_delay = Some(delay);
        self
    }
}

#[async_trait]
impl NodeRpc for MockNode {
    async fn list_channels(&self) -> Result<Vec<Channel>, RpcError> {
        self.channels.clone().map_err(|message| rpc_error(&message))
    }

    async fn get_route(
        &self,
        destination: &str,
        amount_msat: u64,
        max_hops: u32,
    ) -> Result<Route, RpcError> {
        self.route_requests.lock().unwrap().push((destination.to_string(), amount_msat, max_hops));
        match &self.route_error {
            Some(message) => Err(rpc_error(message)),
            None => Ok(route_to(destination)),
        }
    }

    async fn send_pay(&self, _route: &Route, payment_hash: &str) -> Result<(), RpcError> {
        self.payment_hashes.lock().unwrap().push(payment_hash.to_string());
        match &self.send_error {
            Some(message) => Err(rpc_error(message)),
            None => Ok(()),
        }
    }

    async fn wait_send_pay(&self, _payment_hash: &str) -> Result<PaymentSuccess, RpcError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.wait_delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.wait_disconnects {
            return Err(RpcError::Transport(io::Error::from(io::ErrorKind::ConnectionReset)));
        }
        match &self.wait_result {
            Ok(destination) => Ok(PaymentSuccess { destination: destination.clone() }),
            Err(message) => Err(rpc_error(message)),
        }
    }
}
