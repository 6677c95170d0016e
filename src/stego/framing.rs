// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Length-prefixed framing of the embedded bit stream.
//!
//! ```text
//! [4 bytes] body length in bytes (big-endian u32, never enciphered)
//! [N bytes] body
//! ```
//!
//! The prefix is the only structure the extractor understands: after 32 bits
//! it knows exactly how many more bits to read. There is no checksum.

use crate::stego::error::StegoError;

/// Width of the length prefix in bits.
pub const LENGTH_PREFIX_BITS: usize = 32;
/// Width of the length prefix in bytes.
pub const LENGTH_PREFIX_BYTES: usize = LENGTH_PREFIX_BITS / 8;

/// Prepend the length prefix to `body`.
pub fn build_frame(body: &[u8]) -> Result<Vec<u8>, StegoError> {
    let len = u32::try_from(body.len()).map_err(|_| StegoError::MessageTooLarge {
        needed_bits: frame_bits(body.len()),
        capacity_bits: frame_bits(u32::MAX as usize),
    })?;
    let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + body.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Total bits occupied by a framed body of `body_len` bytes.
pub fn frame_bits(body_len: usize) -> u64 {
    LENGTH_PREFIX_BITS as u64 + body_len as u64 * 8
}

/// Decode the length prefix from the first 32 bits (MSB first).
pub fn decode_length(bits: &[u8]) -> Option<u32> {
    if bits.len() < LENGTH_PREFIX_BITS {
        return None;
    }
    Some(
        bits[..LENGTH_PREFIX_BITS]
            .iter()
            .fold(0u32, |acc, &b| (acc << 1) | (b & 1) as u32),
    )
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_big_endian_byte_count() {
        let frame = build_frame(&[0xAA; 300]).unwrap();
        assert_eq!(&frame[..4], &[0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(frame.len(), 304);
        assert_eq!(frame_bits(300), 32 + 2400);
    }

    #[test]
    fn empty_body() {
        let frame = build_frame(&[]).unwrap();
        assert_eq!(frame, vec![0, 0, 0, 0]);
        assert_eq!(decode_length(&bytes_to_bits(&frame)), Some(0));
    }

    #[test]
    fn decode_length_needs_32_bits() {
        let bits = bytes_to_bits(&[0x00, 0x00, 0x01]);
        assert_eq!(decode_length(&bits), None);
        let bits = bytes_to_bits(&[0x12, 0x34, 0x56, 0x78, 0xFF]);
        assert_eq!(decode_length(&bits), Some(0x1234_5678));
    }

    #[test]
    fn bits_are_msb_first() {
        assert_eq!(bytes_to_bits(&[0b1000_0001]), vec![1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(bits_to_bytes(&[1, 0, 1, 1, 0]), vec![0xB0]);
        assert_eq!(bits_to_bytes(&bytes_to_bits(&[0xDE, 0xAD])), vec![0xDE, 0xAD]);
    }
}
