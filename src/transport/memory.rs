// src/transport/memory.rs

//! In-memory transport.
//!
//! `MemoryNetwork` stands in for a set of network peers inside the process.
//! Each bound [`Endpoint`] owns a table of typed method handlers; connecting
//! to an endpoint yields a session that dispatches request envelopes to that
//! table.
//!
//! ## Reference semantics
//!
//! - Connecting to an endpoint with nothing bound fails with `Connectivity`,
//!   like a refused TCP connection.
//! - Unbinding an endpoint breaks sessions already open to it; their next
//!   call fails with `Connectivity`.
//! - An unknown method, a payload the handler cannot decode, or a handler
//!   error is answered with a fault reply, never with a transport error.
//!
//! ## Non-Goals
//!
//! - Byte-level framing (envelopes are passed as values)
//! - Latency or partial-failure simulation

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    // ---
    Connector,
    Endpoint,
    Envelope,
    Result,
    RpcError,
    Transport,
    TransportPtr,
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Method name → handler, per endpoint.
type MethodTable = HashMap<String, Arc<dyn HandlerFn>>;

type EndpointTable = Arc<Mutex<HashMap<Endpoint, MethodTable>>>;

// Handler trait for type-erased async functions
trait HandlerFn: Send + Sync {
    fn call(&self, payload: serde_json::Value) -> BoxFuture<'static, Result<serde_json::Value>>;
}

struct Handler<F, Fut, TReq, TResp>
where
    F: Fn(TReq) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TResp>> + Send,
    TReq: DeserializeOwned,
    TResp: Serialize,
{
    func: F,
    _phantom: std::marker::PhantomData<fn(TReq, TResp, Fut)>,
}

impl<F, Fut, TReq, TResp> HandlerFn for Handler<F, Fut, TReq, TResp>
where
    F: Fn(TReq) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<TResp>> + Send + 'static,
    TReq: DeserializeOwned + Send + 'static,
    TResp: Serialize + Send + 'static,
{
    fn call(&self, payload: serde_json::Value) -> BoxFuture<'static, Result<serde_json::Value>> {
        // ---
        let req: TReq = match serde_json::from_value(payload) {
            Ok(r) => r,
            Err(e) => {
                let err = RpcError::RemoteCall(format!("malformed payload: {e}"));
                return Box::pin(async move { Err(err) });
            }
        };

        let fut = (self.func)(req);

        Box::pin(async move {
            let resp = fut.await?;
            serde_json::to_value(resp)
                .map_err(|e| RpcError::RemoteCall(format!("cannot encode reply: {e}")))
        })
    }
}

/// Acquire mutex guard, ignoring poisoning
fn lock_ignore_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// In-process network of endpoints serving typed method handlers.
///
/// Cloning is cheap; clones share the same endpoints.
///
/// # Example
///
/// ```
/// use concat_rpc::{Connector, Endpoint, Envelope, MemoryNetwork};
///
/// # async fn example() -> concat_rpc::Result<()> {
/// let network = MemoryNetwork::new();
/// let endpoint = Endpoint::new("svc", 9000);
///
/// network.register(&endpoint, "shout", |s: String| async move {
///     Ok(s.to_uppercase())
/// });
///
/// let transport = network.connect(&endpoint).await?;
/// let reply = transport
///     .call(Envelope::request("shout", serde_json::json!("hi")))
///     .await?;
/// assert_eq!(reply.payload, serde_json::json!("HI"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    endpoints: EndpointTable,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` at `endpoint`, binding the endpoint
    /// if it is not bound yet. A later registration for the same method
    /// replaces the earlier one.
    pub fn register<TReq, TResp, F, Fut>(&self, endpoint: &Endpoint, method: &str, handler: F)
    where
        TReq: DeserializeOwned + Send + 'static,
        TResp: Serialize + Send + 'static,
        F: Fn(TReq) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TResp>> + Send + 'static,
    {
        // ---
        let handler_obj = Handler {
            func: handler,
            _phantom: std::marker::PhantomData,
        };

        let mut endpoints = lock_ignore_poison(&self.endpoints);
        endpoints
            .entry(endpoint.clone())
            .or_default()
            .insert(method.to_string(), Arc::new(handler_obj));
    }

    /// Remove `endpoint` and all its handlers. Returns whether it was bound.
    pub fn unbind(&self, endpoint: &Endpoint) -> bool {
        lock_ignore_poison(&self.endpoints).remove(endpoint).is_some()
    }

    fn is_bound(&self, endpoint: &Endpoint) -> bool {
        lock_ignore_poison(&self.endpoints).contains_key(endpoint)
    }
}

#[async_trait::async_trait]
impl Connector for MemoryNetwork {
    // ---
    async fn connect(&self, endpoint: &Endpoint) -> Result<TransportPtr> {
        // ---
        if !self.is_bound(endpoint) {
            return Err(RpcError::Connectivity(format!(
                "cannot connect to {endpoint}: connection refused"
            )));
        }

        Ok(Arc::new(MemoryTransport {
            endpoint: endpoint.clone(),
            endpoints: self.endpoints.clone(),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Session to one endpoint of a [`MemoryNetwork`].
struct MemoryTransport {
    endpoint: Endpoint,
    endpoints: EndpointTable,
    closed: AtomicBool,
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    // ---
    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn call(&self, request: Envelope) -> Result<Envelope> {
        // ---
        if self.closed.load(Ordering::Acquire) {
            return Err(RpcError::Connectivity(format!(
                "session to {} is closed",
                self.endpoint
            )));
        }

        let Some(method) = request.method.clone() else {
            return Ok(Envelope::fault(&request, "request carries no method"));
        };

        // Look up handler; the lock is released before the handler runs
        let handler = {
            let endpoints = lock_ignore_poison(&self.endpoints);
            match endpoints.get(&self.endpoint) {
                Some(methods) => methods.get(&method).cloned(),
                None => {
                    return Err(RpcError::Connectivity(format!(
                        "connection to {} reset",
                        self.endpoint
                    )));
                }
            }
        };

        let Some(handler) = handler else {
            crate::log_warn!("no handler for method {method} at {}", self.endpoint);
            return Ok(Envelope::fault(&request, format!("no handler for method: {method}")));
        };

        match handler.call(request.payload.clone()).await {
            Ok(payload) => Ok(Envelope::reply(&request, payload)),
            Err(e) => Ok(Envelope::fault(&request, e.message())),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
