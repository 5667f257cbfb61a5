//! Domain layer public interface.
//!
//! Abstractions here are independent of any concrete transport, wire format
//! or naming service. All consumers import through this module.

mod service;
mod transport;

pub use service::{
    //
    ConcatService,
    Directory,
    DirectoryPtr,
    ServicePtr,
};

pub use transport::{
    //
    Connector,
    ConnectorPtr,
    Endpoint,
    Envelope,
    Transport,
    TransportPtr,
};
