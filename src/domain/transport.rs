// src/domain/transport.rs

//! Transport domain abstractions.
//!
//! A transport carries one request envelope to a peer and hands back the
//! peer's reply. It knows nothing about registries, method names or payload
//! shapes; those belong to the client layer.
//!
//! Concrete implementations live under `src/transport/`.

use crate::{CorrelationId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A network location: host plus port.
///
/// Used both for the registry address and for the service endpoints the
/// registry hands out.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One framed message exchanged with a peer.
///
/// Requests carry a `method`. Replies echo the request's `correlation_id`
/// and carry either a `payload` or a `fault` describing why the peer could
/// not produce one.
///
/// # Examples
///
/// ```
/// use concat_rpc::Envelope;
///
/// let request = Envelope::request("input", serde_json::json!({"first": "a", "second": "b"}));
/// let reply = Envelope::reply(&request, serde_json::json!("ab"));
///
/// assert_eq!(reply.correlation_id, request.correlation_id);
/// assert!(reply.method.is_none());
/// assert!(reply.fault.is_none());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    // ---
    /// Identifier matching a reply to its request.
    pub correlation_id: CorrelationId,

    /// Remote method to invoke. Always `None` on replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Method arguments on a request, return value on a reply.
    #[serde(default)]
    pub payload: serde_json::Value,

    /// Failure reported by the peer instead of a return value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl Envelope {
    // ---
    /// Create a request envelope with a fresh correlation id.
    pub fn request(method: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            correlation_id: CorrelationId::generate(),
            method: Some(method.into()),
            payload,
            fault: None,
        }
    }

    /// Create a successful reply to `request`.
    pub fn reply(request: &Envelope, payload: serde_json::Value) -> Self {
        Self {
            correlation_id: request.correlation_id.clone(),
            method: None,
            payload,
            fault: None,
        }
    }

    /// Create a fault reply to `request`.
    pub fn fault(request: &Envelope, message: impl Into<String>) -> Self {
        Self {
            correlation_id: request.correlation_id.clone(),
            method: None,
            payload: serde_json::Value::Null,
            fault: Some(message.into()),
        }
    }
}

/// Request/reply transport session to a single endpoint.
///
/// Implementations must ensure that:
/// - `call()` sends exactly one request and returns the reply carrying the
///   same correlation id, or an error.
/// - Session-level failures (connect, I/O, closed session, timeout) are
///   reported as `RpcError::Connectivity`.
/// - Replies that cannot be decoded, or that answer a different request, are
///   reported as `RpcError::RemoteCall`.
///
/// `call()` does not interpret `fault`; the caller decides what a fault means.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    // ---
    /// The peer this session talks to.
    fn endpoint(&self) -> &Endpoint;

    /// Send `request` and wait for its reply.
    async fn call(&self, request: Envelope) -> Result<Envelope>;

    /// Close the session. Further calls fail with `Connectivity`.
    async fn close(&self) -> Result<()>;
}

/// Shared transport pointer.
pub type TransportPtr = Arc<dyn Transport>;

/// Opens transport sessions.
///
/// The connector is the seam between the client layer and the RPC
/// mechanism: TCP in the binary, an in-process network in tests.
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Open a session to `endpoint`.
    ///
    /// Fails with `Connectivity` when nothing accepts connections there.
    async fn connect(&self, endpoint: &Endpoint) -> Result<TransportPtr>;
}

/// Shared connector pointer.
pub type ConnectorPtr = Arc<dyn Connector>;
