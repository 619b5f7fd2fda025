//! Binary vector codec.
//!
//! A stored vector is framed as
//!
//! ```text
//! [varint: format marker][varint: payload length in bytes][payload]
//! ```
//!
//! where the payload is `dimension` consecutive big-endian IEEE-754 doubles.
//! The dimension is never stored; it is derived from the payload length.
//! The marker is written as zero and ignored on read.
//!
//! Decoding never fails loudly. A frame that is truncated, has a bad varint,
//! or carries a payload of the wrong length decodes to `None`, which the
//! scoring session turns into a zero score.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{FastCosineError, Result};
use crate::util::varint::{decode_u32, encode_u32_into};

/// Size of one encoded vector element.
pub const VECTOR_ELEMENT_BYTES: usize = 8;

/// Marker written in front of every frame produced by [`encode`].
pub const FORMAT_MARKER: u32 = 0;

/// Split a frame into its declared payload length and the bytes after the header.
fn read_header(bytes: &[u8]) -> Option<(usize, &[u8])> {
    let (_marker, marker_len) = decode_u32(bytes).ok()?;
    let rest = &bytes[marker_len..];
    let (payload_len, len_len) = decode_u32(rest).ok()?;
    Some((payload_len as usize, &rest[len_len..]))
}

/// Decoder bound to one expected dimension.
///
/// Built once per session from the query vector's length, so the expected
/// payload length is computed once and not per document.
#[derive(Debug, Clone, Copy)]
pub struct VectorCodec {
    dimension: usize,
    payload_len: usize,
}

impl VectorCodec {
    /// Create a codec expecting vectors of `dimension` elements.
    pub fn new(dimension: usize) -> Self {
        VectorCodec {
            dimension,
            payload_len: dimension.saturating_mul(VECTOR_ELEMENT_BYTES),
        }
    }

    /// The dimension this codec accepts.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Decode `bytes` into `scratch`, returning the decoded slice.
    ///
    /// `scratch` is resized to the codec's dimension and overwritten, so one
    /// buffer can serve every document of a session. Returns `None` when the
    /// declared payload length is not `dimension * 8` or the frame is
    /// truncated or malformed.
    pub fn decode_into<'s>(&self, bytes: &[u8], scratch: &'s mut Vec<f64>) -> Option<&'s [f64]> {
        let (payload_len, rest) = read_header(bytes)?;
        if payload_len != self.payload_len {
            return None;
        }
        let payload = rest.get(..payload_len)?;

        scratch.resize(self.dimension, 0.0);
        BigEndian::read_f64_into(payload, &mut scratch[..]);
        Some(&scratch[..])
    }

    /// Decode `bytes` into a freshly allocated vector.
    pub fn decode(&self, bytes: &[u8]) -> Option<Vec<f64>> {
        let mut values = Vec::with_capacity(self.dimension);
        self.decode_into(bytes, &mut values)?;
        Some(values)
    }
}

/// Decode a frame whose dimension is not known up front.
///
/// Used for query vectors supplied in encoded form. The payload must be a
/// non-empty multiple of eight bytes and lie entirely within `bytes`.
pub fn decode_frame(bytes: &[u8]) -> Option<Vec<f64>> {
    let (payload_len, _) = read_header(bytes)?;
    if payload_len == 0 || payload_len % VECTOR_ELEMENT_BYTES != 0 {
        return None;
    }
    VectorCodec::new(payload_len / VECTOR_ELEMENT_BYTES).decode(bytes)
}

/// Encode `values` into a frame.
pub fn encode(values: &[f64]) -> Result<Vec<u8>> {
    let payload_len = values
        .len()
        .checked_mul(VECTOR_ELEMENT_BYTES)
        .and_then(|len| u32::try_from(len).ok())
        .ok_or_else(|| {
            FastCosineError::invalid_argument(format!(
                "vector of {} elements is too large to encode",
                values.len()
            ))
        })?;

    let mut bytes = Vec::with_capacity(10 + payload_len as usize);
    encode_u32_into(FORMAT_MARKER, &mut bytes);
    encode_u32_into(payload_len, &mut bytes);

    let header_len = bytes.len();
    bytes.resize(header_len + payload_len as usize, 0);
    BigEndian::write_f64_into(values, &mut bytes[header_len..]);

    Ok(bytes)
}
