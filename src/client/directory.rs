use std::sync::Arc;

use super::RemoteConcatService;
use crate::protocol::{LookupRequest, LookupResponse, METHOD_LOOKUP};
use crate::{
    // ---
    ConnectorPtr,
    Directory,
    Endpoint,
    Envelope,
    Result,
    RpcError,
    ServicePtr,
    TransportPtr,
};

/// Registry session resolving service names to remote handles.
///
/// Handles returned by [`lookup`](Directory::lookup) connect through the same
/// connector the directory was located with.
pub struct RemoteDirectory {
    // ---
    transport: TransportPtr,
    connector: ConnectorPtr,
}

impl RemoteDirectory {
    /// Open a session to the registry at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Connectivity`] if the registry cannot be reached.
    pub async fn locate(endpoint: &Endpoint, connector: ConnectorPtr) -> Result<Self> {
        // ---
        let transport = connector.connect(endpoint).await?;
        crate::log_debug!("registry session open to {endpoint}");
        Ok(Self {
            transport,
            connector,
        })
    }

    /// Address of the registry this session talks to.
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }
}

#[async_trait::async_trait]
impl Directory for RemoteDirectory {
    // ---
    async fn lookup(&self, name: &str) -> Result<ServicePtr> {
        // ---
        let payload = serde_json::to_value(LookupRequest {
            name: name.to_string(),
        })
        .map_err(|e| RpcError::Resolution(format!("cannot encode lookup: {e}")))?;

        let reply = self
            .transport
            .call(Envelope::request(METHOD_LOOKUP, payload))
            .await
            .map_err(RpcError::into_resolution)?;

        if let Some(fault) = reply.fault {
            crate::log_debug!("registry refused lookup of {name}: {fault}");
            return Err(RpcError::Resolution(fault));
        }

        let LookupResponse { endpoint } = serde_json::from_value(reply.payload).map_err(|e| {
            RpcError::Resolution(format!("registry reply for {name} is unusable: {e}"))
        })?;

        crate::log_debug!("resolved {name} to {endpoint}");

        Ok(Arc::new(RemoteConcatService::new(
            name,
            endpoint,
            self.connector.clone(),
        )))
    }

    async fn close(&self) -> Result<()> {
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::MemoryNetwork;

    fn registry_with(binding: Option<Endpoint>) -> (MemoryNetwork, Endpoint) {
        // ---
        let network = MemoryNetwork::new();
        let registry = Endpoint::new("registry", 1030);
        network.register(&registry, METHOD_LOOKUP, move |req: LookupRequest| {
            let binding = binding.clone();
            async move {
                match binding {
                    Some(endpoint) if req.name == "DBServ" => Ok(LookupResponse { endpoint }),
                    _ => Err(RpcError::Resolution(format!("name not bound: {}", req.name))),
                }
            }
        });
        (network, registry)
    }

    #[tokio::test]
    async fn test_locate_unreachable_registry() {
        // ---
        let network = MemoryNetwork::new();
        let err = RemoteDirectory::locate(&Endpoint::new("registry", 1030), Arc::new(network))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RpcError::Connectivity(_)));
    }

    #[tokio::test]
    async fn test_lookup_bound_name() {
        // ---
        let service = Endpoint::new("db", 2000);
        let (network, registry) = registry_with(Some(service));
        let directory = RemoteDirectory::locate(&registry, Arc::new(network))
            .await
            .unwrap();

        assert!(directory.lookup("DBServ").await.is_ok());
        assert_eq!(directory.endpoint(), &registry);
    }

    #[tokio::test]
    async fn test_lookup_unbound_name_is_resolution_error() {
        // ---
        let (network, registry) = registry_with(None);
        let directory = RemoteDirectory::locate(&registry, Arc::new(network))
            .await
            .unwrap();

        let err = directory.lookup("DBServ").await.err().unwrap();
        assert_eq!(err, RpcError::Resolution("name not bound: DBServ".into()));
    }

    #[tokio::test]
    async fn test_lookup_after_registry_vanishes_is_connectivity_error() {
        // ---
        let (network, registry) = registry_with(Some(Endpoint::new("db", 2000)));
        let directory = RemoteDirectory::locate(&registry, Arc::new(network.clone()))
            .await
            .unwrap();
        network.unbind(&registry);

        let err = directory.lookup("DBServ").await.err().unwrap();
        assert!(matches!(err, RpcError::Connectivity(_)));
    }

    #[tokio::test]
    async fn test_lookup_garbled_reply_is_resolution_error() {
        // ---
        let network = MemoryNetwork::new();
        let registry = Endpoint::new("registry", 1030);
        network.register(&registry, METHOD_LOOKUP, |_: LookupRequest| async move {
            Ok("not an endpoint")
        });

        let directory = RemoteDirectory::locate(&registry, Arc::new(network))
            .await
            .unwrap();
        let err = directory.lookup("DBServ").await.err().unwrap();
        assert!(matches!(err, RpcError::Resolution(_)));
    }
}
