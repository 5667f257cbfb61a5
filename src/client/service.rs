use crate::protocol::{InputRequest, METHOD_INPUT};
use crate::{
    // ---
    ConcatService,
    ConnectorPtr,
    Endpoint,
    Envelope,
    Result,
    RpcError,
};

/// Handle to a concatenation service resolved from a registry.
///
/// Holds only the endpoint; each [`input`](ConcatService::input) call opens
/// its own session, performs the call and closes the session. A service that
/// went away after the lookup therefore surfaces as a remote-call failure.
pub struct RemoteConcatService {
    // ---
    name: String,
    endpoint: Endpoint,
    connector: ConnectorPtr,
}

impl RemoteConcatService {
    pub fn new(name: impl Into<String>, endpoint: Endpoint, connector: ConnectorPtr) -> Self {
        Self {
            name: name.into(),
            endpoint,
            connector,
        }
    }

    async fn invoke(&self, request: Envelope) -> Result<String> {
        // ---
        let transport = self.connector.connect(&self.endpoint).await?;
        let reply = transport.call(request).await;

        if let Err(e) = transport.close().await {
            crate::log_warn!("closing session to {} failed: {e}", self.endpoint);
        }

        let reply = reply?;
        if let Some(fault) = reply.fault {
            return Err(RpcError::RemoteCall(fault));
        }

        serde_json::from_value(reply.payload).map_err(|e| {
            RpcError::RemoteCall(format!("{} returned a non-string result: {e}", self.name))
        })
    }
}

#[async_trait::async_trait]
impl ConcatService for RemoteConcatService {
    // ---
    async fn input(&self, first: &str, second: &str) -> Result<String> {
        // ---
        let payload = serde_json::to_value(InputRequest {
            first: first.to_string(),
            second: second.to_string(),
        })
        .map_err(|e| RpcError::RemoteCall(format!("cannot encode arguments: {e}")))?;

        crate::log_debug!("calling {}.{METHOD_INPUT} at {}", self.name, self.endpoint);

        self.invoke(Envelope::request(METHOD_INPUT, payload))
            .await
            .map_err(RpcError::into_remote_call)
    }
}
