//! Wire protocol shared by the registry and the service.
//!
//! This module defines the payloads carried inside envelopes and the
//! framing used to put envelopes on a byte stream.

mod codec;
mod message;

pub use codec::{EnvelopeCodec, MAX_FRAME_LENGTH};
pub use message::{InputRequest, LookupRequest, LookupResponse, METHOD_INPUT, METHOD_LOOKUP};
