//! Envelope framing.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! UTF-8 JSON holding one [`Envelope`].

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::{Envelope, RpcError};

/// Largest frame either side accepts.
pub const MAX_FRAME_LENGTH: usize = 8 * 1024 * 1024;

/// `tokio_util` codec turning a byte stream into envelopes and back.
///
/// Socket errors surface as `Connectivity`; frames that are oversized or do
/// not hold a valid envelope surface as `RemoteCall`.
#[derive(Debug)]
pub struct EnvelopeCodec {
    frames: LengthDelimitedCodec,
}

impl EnvelopeCodec {
    pub fn new() -> Self {
        Self {
            frames: LengthDelimitedCodec::builder()
                .max_frame_length(MAX_FRAME_LENGTH)
                .new_codec(),
        }
    }
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for EnvelopeCodec {
    type Item = Envelope;
    type Error = RpcError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Envelope>, RpcError> {
        // ---
        let frame = match self.frames.decode(src) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => return Err(RpcError::RemoteCall(format!("rejected frame: {e}"))),
        };

        serde_json::from_slice(&frame)
            .map(Some)
            .map_err(|e| RpcError::RemoteCall(format!("malformed envelope: {e}")))
    }
}

impl Encoder<Envelope> for EnvelopeCodec {
    type Error = RpcError;

    fn encode(&mut self, env: Envelope, dst: &mut BytesMut) -> Result<(), RpcError> {
        // ---
        let json = serde_json::to_vec(&env)
            .map_err(|e| RpcError::RemoteCall(format!("cannot encode envelope: {e}")))?;

        self.frames
            .encode(Bytes::from(json), dst)
            .map_err(|e| RpcError::RemoteCall(format!("cannot frame envelope: {e}")))
    }
}
