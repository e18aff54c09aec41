//! JSON-RPC 2.0 envelopes and stream framing.
//!
//! `lightningd` ends every message with a blank line. [`JsonReader`] only
//! tries to parse once such a delimiter arrives; a value left without one
//! when the stream closes is still accepted.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::host::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request is not valid in the current state
pub const INVALID_REQUEST: i64 = -32600;

/// Method not found
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid request or parameters
pub const INVALID_PARAMS: i64 = -32602;

/// A request or, without an id, a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_version")]
    pub jsonrpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

impl Request {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self { jsonrpc: default_version(), id: Some(id.into()), method: method.into(), params }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "default_version")]
    pub jsonrpc: String,

    #[serde(default)]
    pub id: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: default_version(), id, result: Some(result), error: None }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: None,
            error: Some(ErrorObject { code, message: message.into(), data: None }),
        }
    }

    /// Split into the result value or the node's error
    pub fn into_result(self) -> Result<Value, RpcError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(RpcError::Rpc { code: error.code, message: error.message }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::Decode("response has neither result nor error".into())),
        }
    }
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Blank line `lightningd` ends every message with
const FRAME_DELIMITER: &[u8] = b"\n\n";

const READ_CHUNK: usize = 16 * 1024;

/// Reads consecutive JSON values from a byte stream.
///
/// A frame is only parsed once a delimiter has arrived after it, so every
/// byte is scanned once and every complete message parsed once.
pub struct JsonReader<R> {
    inner: R,
    buf: Vec<u8>,
    /// Where the next delimiter search starts
    scanned: usize,
}

impl<R: AsyncRead + Unpin> JsonReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, buf: Vec::new(), scanned: 0 }
    }

    /// Next complete JSON value, or `None` once the stream ends cleanly
    pub async fn next_message(&mut self) -> Result<Option<Value>, RpcError> {
        loop {
            while let Some(end) = self.next_delimiter() {
                if let Some(value) = self.parse_frame(end)? {
                    return Ok(Some(value));
                }
            }

            let mut chunk = [0u8; READ_CHUNK];
            let read = self.inner.read(&mut chunk).await?;
            if read == 0 {
                return self.finish();
            }
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Next value decoded as `T`
    pub async fn next<T: serde::de::DeserializeOwned>(&mut self) -> Result<Option<T>, RpcError> {
        match self.next_message().await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// End of the next unexamined delimiter in the buffer
    fn next_delimiter(&mut self) -> Option<usize> {
        let start = self.scanned;
        match self.buf[start..].windows(FRAME_DELIMITER.len()).position(|w| w == FRAME_DELIMITER) {
            Some(offset) => {
                self.scanned = start + offset + 1;
                Some(start + offset + FRAME_DELIMITER.len())
            }
            None => {
                // A delimiter may straddle the next read
                self.scanned = self.buf.len().saturating_sub(FRAME_DELIMITER.len() - 1).max(start);
                None
            }
        }
    }

    /// Parse the value in `buf[..end]`, `None` while it is still incomplete
    fn parse_frame(&mut self, end: usize) -> Result<Option<Value>, RpcError> {
        let parsed = {
            let mut stream = serde_json::Deserializer::from_slice(&self.buf[..end]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) => Some((value, stream.byte_offset())),
                Some(Err(e)) if e.is_eof() => None,
                Some(Err(e)) => return Err(e.into()),
                None => None,
            }
        };

        let Some((value, consumed)) = parsed else {
            return Ok(None);
        };
        let trailing = self.buf[consumed..].iter().take_while(|b| b.is_ascii_whitespace()).count();
        self.buf.drain(..consumed + trailing);
        self.scanned = 0;
        Ok(Some(value))
    }

    /// Whatever is left once the stream closed
    fn finish(&mut self) -> Result<Option<Value>, RpcError> {
        if self.buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match self.parse_frame(self.buf.len())? {
            Some(value) => Ok(Some(value)),
            None => Err(RpcError::Transport(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed mid-message",
            ))),
        }
    }
}

/// Write one message followed by the blank line `lightningd` expects
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), RpcError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut bytes = serde_json::to_vec(message)?;
    bytes.extend_from_slice(b"\n\n");
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reader_splits_back_to_back_messages() {
        let input: &[u8] = b"{\"id\":1,\"method\":\"a\"}\n\n{\"id\":2,\n\"method\":\"b\"}\n\n";
        let mut reader = JsonReader::new(input);

        let first: Request = reader.next().await.unwrap().unwrap();
        let second: Request = reader.next().await.unwrap().unwrap();

        assert_eq!(first.method, "a");
        assert_eq!(second.id, Some(json!(2)));
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_handles_single_byte_reads() {
        let (mut tx, rx) = tokio::io::duplex(1);
        tokio::spawn(async move {
            tx.write_all(b"{\"id\":1,\n\"method\":\"a\"}\n\n\n{\"id\":2,\"method\":\"b\"}\n\n").await.unwrap();
        });
        let mut reader = JsonReader::new(rx);

        let first: Request = reader.next().await.unwrap().unwrap();
        let second: Request = reader.next().await.unwrap().unwrap();

        assert_eq!(first.method, "a");
        assert_eq!(second.method, "b");
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_accepts_last_message_without_delimiter() {
        let input: &[u8] = b"{\"id\":1,\"method\":\"a\"}\n\n{\"id\":2,\"method\":\"b\"}";
        let mut reader = JsonReader::new(input);

        let first: Request = reader.next().await.unwrap().unwrap();
        let second: Request = reader.next().await.unwrap().unwrap();

        assert_eq!(first.method, "a");
        assert_eq!(second.method, "b");
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reader_rejects_truncated_message() {
        let input: &[u8] = b"{\"id\":1,\"meth";
        let mut reader = JsonReader::new(input);

        assert!(matches!(reader.next_message().await, Err(RpcError::Transport(_))));
    }

    #[tokio::test]
    async fn test_reader_rejects_garbage() {
        let input: &[u8] = b"not json";
        let mut reader = JsonReader::new(input);

        assert!(matches!(reader.next_message().await, Err(RpcError::Decode(_))));
    }

    #[tokio::test]
    async fn test_write_message_appends_blank_line() {
        let mut out = Vec::new();
        write_message(&mut out, &Response::success(json!(7), json!({}))).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n\n"));
        assert!(text.contains("\"id\":7"));
        assert!(!text.contains("error"));
    }

    #[test]
    fn test_error_response_maps_to_rpc_error() {
        let response: Response = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": { "code": 204, "message": "failed: WIRE_TEMPORARY_CHANNEL_FAILURE" }
        }))
        .unwrap();

        match response.into_result() {
            Err(RpcError::Rpc { code, message }) => {
                assert_eq!(code, 204);
                assert_eq!(message, "failed: WIRE_TEMPORARY_CHANNEL_FAILURE");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
