//! Remote string concatenation over a naming registry.
//!
//! The client locates a registry, resolves a named service handle there,
//! reads two lines from the operator and sends both to the service's
//! `input` method, printing whatever the service returns.
//!
//! The RPC mechanism sits behind the [`Connector`] / [`Transport`] traits:
//! [`TcpConnector`] for real deployments, [`MemoryNetwork`] for in-process
//! use and tests.

// Import all sub modules once...
mod macros;

mod client;
mod domain;
mod transport;

pub mod protocol;

mod cli;
mod logging;
mod rpc_config;

mod correlation;
mod error;

pub(crate) use macros::{log_debug, log_error, log_info, log_warn};

// Re-export main types
pub use client::{
    //
    RemoteConcatClient,
    RemoteConcatService,
    RemoteDirectory,
    FIRST_PROMPT,
    RESULT_LABEL,
    SECOND_PROMPT,
};

pub use cli::Cli;
pub use logging::init_logging;
pub use rpc_config::{RpcConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SERVICE_NAME};

pub use correlation::CorrelationId;
pub use error::{Result, RpcError};

pub use transport::{MemoryNetwork, TcpConnector};

// --- public re-exports
pub use domain::{
    //
    ConcatService,
    Connector,
    ConnectorPtr,
    Directory,
    DirectoryPtr,
    Endpoint,
    Envelope,
    ServicePtr,
    Transport,
    TransportPtr,
};
