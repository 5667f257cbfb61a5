//! Throwaway TCP stand-ins for the registry and the service.
//!
//! They speak the same length-delimited JSON envelopes as the client, using
//! the crate's public codec.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

use concat_rpc::protocol::{
    //
    EnvelopeCodec,
    InputRequest,
    LookupRequest,
    LookupResponse,
    METHOD_INPUT,
    METHOD_LOOKUP,
};
use concat_rpc::{Endpoint, Envelope};

/// A listener answering every request with `handler`'s reply.
///
/// Dropping it stops accepting new connections.
pub struct FakePeer {
    pub endpoint: Endpoint,
    task: JoinHandle<()>,
}

impl Drop for FakePeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub async fn spawn_peer<F>(handler: F) -> FakePeer
where
    F: Fn(Envelope) -> Envelope + Send + Sync + 'static,
{
    // ---
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handler = Arc::new(handler);

    let task = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, EnvelopeCodec::new());
                while let Some(Ok(request)) = framed.next().await {
                    if framed.send(handler(request)).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    FakePeer {
        endpoint: Endpoint::new("127.0.0.1", port),
        task,
    }
}

/// Registry answering `lookup` from a fixed table.
pub async fn spawn_registry(bindings: HashMap<String, Endpoint>) -> FakePeer {
    // ---
    spawn_peer(move |request| {
        if request.method.as_deref() != Some(METHOD_LOOKUP) {
            return Envelope::fault(&request, "no handler for method");
        }
        let Ok(LookupRequest { name }) = serde_json::from_value::<LookupRequest>(request.payload.clone()) else {
            return Envelope::fault(&request, "malformed lookup");
        };
        match bindings.get(&name) {
            Some(endpoint) => Envelope::reply(
                &request,
                serde_json::to_value(LookupResponse {
                    endpoint: endpoint.clone(),
                })
                .unwrap(),
            ),
            None => Envelope::fault(&request, format!("name not bound: {name}")),
        }
    })
    .await
}

/// Service joining the two strings with no separator.
pub async fn spawn_joiner() -> FakePeer {
    // ---
    spawn_service(|first, second| Ok(format!("{first}{second}"))).await
}

/// Service computing its reply (or fault) with `join`.
pub async fn spawn_service<J>(join: J) -> FakePeer
where
    J: Fn(&str, &str) -> Result<String, String> + Send + Sync + 'static,
{
    // ---
    spawn_peer(move |request| {
        if request.method.as_deref() != Some(METHOD_INPUT) {
            return Envelope::fault(&request, "no handler for method");
        }
        let Ok(InputRequest { first, second }) =
            serde_json::from_value::<InputRequest>(request.payload.clone())
        else {
            return Envelope::fault(&request, "malformed input");
        };
        match join(&first, &second) {
            Ok(joined) => Envelope::reply(&request, serde_json::json!(joined)),
            Err(fault) => Envelope::fault(&request, fault),
        }
    })
    .await
}

/// Registry binding `DBServ` to `service`.
pub async fn registry_for(service: &FakePeer) -> FakePeer {
    // ---
    let mut bindings = HashMap::new();
    bindings.insert("DBServ".to_string(), service.endpoint.clone());
    spawn_registry(bindings).await
}

/// A local port nothing listens on.
pub async fn dead_port() -> u16 {
    // ---
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
