// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! ID3v2 tag detection.
//!
//! A leading ID3v2 tag is skipped before frame scanning so that sync-like
//! byte pairs inside tag text or cover art are never mistaken for frames.

/// ID3v2 magic bytes.
pub const MAGIC: &[u8; 3] = b"ID3";

/// Length of the ID3v2 header (and of the optional footer).
pub const HEADER_LEN: usize = 10;

const FLAG_FOOTER: u8 = 0x10;

/// Decode a 4-byte synchsafe integer (7 significant bits per byte).
pub fn decode_synchsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | (b & 0x7F) as u32)
}

/// Encode a value below 2^28 as a synchsafe integer.
pub fn encode_synchsafe(value: u32) -> [u8; 4] {
    debug_assert!(value < 1 << 28);
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

/// Total bytes occupied by an ID3v2 tag at the start of `data`, or 0.
///
/// The result may exceed `data.len()` when the tag claims more bytes than
/// are present.
pub fn tag_len(data: &[u8]) -> usize {
    if data.len() < HEADER_LEN || &data[..3] != MAGIC {
        return 0;
    }
    let flags = data[5];
    let size = decode_synchsafe([data[6], data[7], data[8], data[9]]) as usize;
    let footer = if flags & FLAG_FOOTER != 0 { HEADER_LEN } else { 0 };
    HEADER_LEN + size + footer
}
