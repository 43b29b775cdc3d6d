//! Frame codec for [`ClientboundPacket`]s handed to a connection sink.
//!
//! Wire format:
//! ```text
//! [version:1][reserved:3][payload_len:4][payload:N]
//! ```
//! The 8-byte header is big-endian; the payload is the bincode encoding of
//! the packet.

use thiserror::Error;

use super::packets::ClientboundPacket;

/// Frame format version.
pub const FRAME_VERSION: u8 = 1;

/// Size of the frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Frames larger than this are rejected on decode.
pub const MAX_PAYLOAD_LEN: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("unsupported frame version: {0}")]
    UnsupportedVersion(u8),

    #[error("payload of {0} bytes exceeds the frame limit")]
    PayloadTooLarge(usize),

    #[error("failed to encode packet: {0}")]
    Encode(#[source] bincode::Error),

    #[error("malformed payload: {0}")]
    Decode(#[source] bincode::Error),
}

/// Encodes one packet into a self-delimiting frame.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails and
/// [`CodecError::PayloadTooLarge`] if the payload would not fit a frame.
pub fn encode_packet(packet: &ClientboundPacket) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(packet).map_err(CodecError::Encode)?;
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CodecError::PayloadTooLarge(payload.len()));
    }

    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    buf.push(FRAME_VERSION);
    buf.extend_from_slice(&[0x00; 3]);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one packet from the start of `bytes`.
///
/// Returns the packet and the number of bytes consumed so the caller can
/// advance through a buffer holding several frames.
///
/// # Errors
///
/// Returns [`CodecError`] if the header is short or malformed, or if the
/// payload does not decode.
pub fn decode_packet(bytes: &[u8]) -> Result<(ClientboundPacket, usize), CodecError> {
    if bytes.len() < FRAME_HEADER_SIZE {
        return Err(CodecError::InsufficientData {
            needed: FRAME_HEADER_SIZE,
            available: bytes.len(),
        });
    }
    if bytes[0] != FRAME_VERSION {
        return Err(CodecError::UnsupportedVersion(bytes[0]));
    }

    let payload_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(CodecError::PayloadTooLarge(payload_len));
    }
    let total = FRAME_HEADER_SIZE + payload_len;
    if bytes.len() < total {
        return Err(CodecError::InsufficientData {
            needed: total,
            available: bytes.len(),
        });
    }

    let packet =
        bincode::deserialize(&bytes[FRAME_HEADER_SIZE..total]).map_err(CodecError::Decode)?;
    Ok((packet, total))
}
