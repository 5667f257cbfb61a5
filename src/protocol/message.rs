use crate::Endpoint;
use serde::{Deserialize, Serialize};

/// Registry method resolving a name to a service endpoint.
pub const METHOD_LOOKUP: &str = "lookup";

/// Service method joining two strings.
pub const METHOD_INPUT: &str = "input";

/// Payload of a `lookup` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub name: String,
}

/// Payload of a successful `lookup` reply.
///
/// An unbound name is answered with a fault, never with this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub endpoint: Endpoint,
}

/// Payload of an `input` request. The reply payload is a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    pub first: String,
    pub second: String,
}
