use thiserror::Error;

/// Errors that can occur while resolving or invoking the remote service.
///
/// The set is closed: every failure a run can hit maps onto one of these
/// kinds, so callers match on the variant rather than on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The registry (or a transport session) could not be reached or was lost.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// The registry has no usable binding for the requested name.
    #[error("resolution failure: {0}")]
    Resolution(String),

    /// The remote invocation itself faulted.
    #[error("remote call failure: {0}")]
    RemoteCall(String),

    /// Console input was exhausted or console I/O failed.
    #[error("input failure: {0}")]
    Input(String),

    /// Configuration was rejected before a run started.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RpcError {
    /// The message without its kind prefix.
    pub fn message(&self) -> &str {
        // ---
        match self {
            RpcError::Connectivity(msg)
            | RpcError::Resolution(msg)
            | RpcError::RemoteCall(msg)
            | RpcError::Input(msg)
            | RpcError::Config(msg) => msg,
        }
    }

    /// Re-classify a failure that happened while talking to the registry.
    ///
    /// Lost sessions stay `Connectivity`; anything else means the lookup
    /// produced no usable handle.
    pub(crate) fn into_resolution(self) -> Self {
        // ---
        match self {
            RpcError::Connectivity(_) | RpcError::Resolution(_) => self,
            other => RpcError::Resolution(other.message().to_string()),
        }
    }

    /// Re-classify a failure that happened while invoking the service.
    pub(crate) fn into_remote_call(self) -> Self {
        // ---
        match self {
            RpcError::RemoteCall(_) => self,
            other => RpcError::RemoteCall(other.message().to_string()),
        }
    }
}

impl From<std::io::Error> for RpcError {
    fn from(err: std::io::Error) -> Self {
        RpcError::Connectivity(err.to_string())
    }
}

/// Result type alias for RPC operations
pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_display_carries_kind() {
        // ---
        let err = RpcError::Resolution("name not bound: DBServ".into());
        assert_eq!(err.to_string(), "resolution failure: name not bound: DBServ");
        assert_eq!(err.message(), "name not bound: DBServ");
    }

    #[test]
    fn test_into_resolution_keeps_connectivity() {
        // ---
        let lost = RpcError::Connectivity("connection reset".into());
        assert_eq!(lost.clone().into_resolution(), lost);

        let garbled = RpcError::RemoteCall("malformed frame".into());
        assert_eq!(
            garbled.into_resolution(),
            RpcError::Resolution("malformed frame".into())
        );
    }

    #[test]
    fn test_into_remote_call_folds_everything() {
        // ---
        let refused = RpcError::Connectivity("connection refused".into());
        assert_eq!(
            refused.into_remote_call(),
            RpcError::RemoteCall("connection refused".into())
        );
    }
}
