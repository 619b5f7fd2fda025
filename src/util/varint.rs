//! Variable-length integer encoding utilities.
//!
//! The layout is the one Lucene uses for its `VInt`: seven payload bits per
//! byte, least significant group first, high bit set on every byte except the
//! last. A `u32` never takes more than five bytes.

use crate::error::{FastCosineError, Result};

/// Longest encoding of a `u32`.
pub const MAX_VARINT32_LEN: usize = 5;

/// Append the variable-length encoding of `value` to `out`.
///
/// Returns the number of bytes written.
pub fn encode_u32_into(value: u32, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    let mut val = value;

    while val >= 0x80 {
        out.push((val as u8 & 0x7F) | 0x80);
        val >>= 7;
    }
    out.push(val as u8);

    out.len() - start
}

/// Decode a u32 value from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut result = 0u32;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VARINT32_LEN - 1 && byte & 0xF0 != 0 {
            return Err(FastCosineError::other("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u32) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(FastCosineError::other("Incomplete VarInt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MAX_VARINT32_LEN);
        encode_u32_into(value, &mut bytes);
        bytes
    }

    #[test]
    fn test_encode_decode_u32() {
        let test_values = [0, 1, 127, 128, 255, 256, 16383, 16384, u32::MAX];

        for &value in &test_values {
            let encoded = encode(value);
            let (decoded, bytes_read) = decode_u32(&encoded).unwrap();

            assert_eq!(value, decoded);
            assert_eq!(encoded.len(), bytes_read);
        }
    }

    #[test]
    fn test_lucene_layout() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(16), vec![0x10]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn test_encode_appends() {
        let mut out = vec![0xAA];
        assert_eq!(encode_u32_into(300, &mut out), 2);
        assert_eq!(encode_u32_into(1, &mut out), 1);
        assert_eq!(out, vec![0xAA, 0xAC, 0x02, 0x01]);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let (value, read) = decode_u32(&[0x10, 0xFF, 0xFF]).unwrap();
        assert_eq!(value, 16);
        assert_eq!(read, 1);
    }

    #[test]
    fn test_encoding_efficiency() {
        assert_eq!(encode(127).len(), 1);
        assert_eq!(encode(128).len(), 2);
        assert_eq!(encode(16383).len(), 2);
        assert_eq!(encode(16384).len(), 3);
        assert_eq!(encode(u32::MAX).len(), MAX_VARINT32_LEN);
    }

    #[test]
    fn test_incomplete_varint() {
        assert!(decode_u32(&[0x80]).is_err());
        assert!(decode_u32(&[]).is_err());
    }

    #[test]
    fn test_overflow() {
        assert!(decode_u32(&[0xFF; 10]).is_err());
    }
}
