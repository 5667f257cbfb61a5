// src/transport/tcp.rs

//! TCP transport.
//!
//! One `TcpTransport` owns one TCP connection and performs strictly
//! sequential request/reply exchanges over it, framed by [`EnvelopeCodec`].
//! The connection is owned behind an async mutex, so a second `call()` waits
//! for the first to finish rather than interleaving frames. A failed or
//! timed-out exchange closes the session: a late reply must never be read as
//! the answer to a later request.
//!
//! ## Timeouts
//!
//! With no timeout configured, `connect()` and `call()` block until the
//! operating system reports success or failure. With a timeout, each connect
//! and each whole exchange (send + reply) is bounded independently.

use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::Framed;

use crate::protocol::EnvelopeCodec;
use crate::{
    // ---
    Connector,
    Endpoint,
    Envelope,
    Result,
    RpcConfig,
    RpcError,
    Transport,
    TransportPtr,
};

type Session = Framed<TcpStream, EnvelopeCodec>;

/// Opens TCP sessions to endpoints.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    request_timeout: Option<Duration>,
}

impl TcpConnector {
    /// Connector with no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector bounded by the config's `request_timeout`.
    pub fn from_config(config: &RpcConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
        }
    }

    /// Bound every connect and call by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[async_trait::async_trait]
impl Connector for TcpConnector {
    // ---
    async fn connect(&self, endpoint: &Endpoint) -> Result<TransportPtr> {
        // ---
        crate::log_debug!("connecting to {endpoint}");

        let connect = TcpStream::connect((endpoint.host.as_str(), endpoint.port));
        let stream = bounded(self.request_timeout, connect, || {
            format!("connect to {endpoint}")
        })
        .await?
        .map_err(|e| RpcError::Connectivity(format!("cannot connect to {endpoint}: {e}")))?;

        if let Err(e) = stream.set_nodelay(true) {
            crate::log_warn!("set_nodelay failed for {endpoint}: {e}");
        }

        crate::log_debug!("connected to {endpoint}");

        Ok(Arc::new(TcpTransport {
            endpoint: endpoint.clone(),
            session: Mutex::new(Some(Framed::new(stream, EnvelopeCodec::new()))),
            request_timeout: self.request_timeout,
        }))
    }
}

/// A single TCP session.
struct TcpTransport {
    endpoint: Endpoint,
    session: Mutex<Option<Session>>,
    request_timeout: Option<Duration>,
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    // ---
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn call(&self, request: Envelope) -> Result<Envelope> {
        // ---
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or_else(|| {
            RpcError::Connectivity(format!("session to {} is closed", self.endpoint))
        })?;

        let expected = request.correlation_id.clone();
        let endpoint = &self.endpoint;

        let outcome = bounded(self.request_timeout, exchange(session, request, endpoint), || {
            format!("call to {endpoint}")
        })
        .await
        .and_then(|reply| reply)
        .and_then(|reply| {
            if reply.correlation_id == expected {
                Ok(reply)
            } else {
                Err(RpcError::RemoteCall(format!(
                    "reply from {endpoint} answers {} instead of {expected}",
                    reply.correlation_id
                )))
            }
        });

        if let Err(ref e) = outcome {
            crate::log_debug!("dropping session to {endpoint}: {e}");
            guard.take();
        }
        outcome
    }

    async fn close(&self) -> Result<()> {
        // ---
        let session = self.session.lock().await.take();
        if let Some(mut session) = session {
            crate::log_debug!("closing session to {}", self.endpoint);
            session.close().await?;
        }
        Ok(())
    }
}

/// Send one request and read one reply.
async fn exchange(session: &mut Session, request: Envelope, endpoint: &Endpoint) -> Result<Envelope> {
    // ---
    session.send(request).await?;

    match session.next().await {
        Some(reply) => reply,
        None => Err(RpcError::Connectivity(format!(
            "{endpoint} closed the connection before replying"
        ))),
    }
}

/// Await `fut`, failing with `Connectivity` if `limit` elapses first.
async fn bounded<F, D>(limit: Option<Duration>, fut: F, describe: D) -> Result<F::Output>
where
    F: Future,
    D: FnOnce() -> String,
{
    // ---
    match limit {
        None => Ok(fut.await),
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            RpcError::Connectivity(format!("{} timed out after {limit:?}", describe()))
        }),
    }
}
