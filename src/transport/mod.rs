//! Transport implementations.
//!
//! Concrete implementations of the domain-level `Connector` and `Transport`
//! traits. Client code must not depend on transport-specific types beyond
//! the connector it is handed.

mod memory;
mod tcp;

pub use memory::MemoryNetwork;
pub use tcp::TcpConnector;
