//! JSON-RPC plumbing for talking to `lightningd`.
//!
//! - `jsonrpc`: message envelopes and framing shared by the socket client
//!   and the plugin's stdio channel
//! - `client`: [`LightningRpc`], the [`crate::NodeRpc`] implementation over
//!   the node's Unix socket

pub mod client;
pub mod jsonrpc;

pub use client::LightningRpc;
pub use jsonrpc::{ErrorObject, JsonReader, Request, Response, write_message};
