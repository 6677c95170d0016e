// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! MPEG audio frame scanner (no stego knowledge).
//!
//! Walks a byte buffer, skips a leading ID3v2 tag, and collects every frame
//! whose header decodes and whose full length fits in the buffer. Bytes that
//! do not start a valid header are skipped one at a time (resync); a frame
//! that would run past the end of the buffer stops the scan.
//!
//! Supports MPEG-1/2/2.5 headers for Layers I–III, but side-information
//! parsing (and therefore the ancillary estimate) follows the MPEG-1
//! Layer III layout for every frame.
//!
//! Does NOT:
//! - decode Huffman data or follow the bit reservoir
//! - account for the CRC word after a protected header
//! - handle free-format bitstreams

pub mod error;
pub mod bitio;
pub mod tables;
pub mod header;
pub mod side_info;
pub mod id3;
pub mod frame;

use frame::Frame;
use header::{is_sync, FrameHeader, HEADER_LEN};

/// Frame layout of a carrier buffer.
///
/// Built fresh from the bytes on every scan; holds no reference to them.
#[derive(Debug, Clone)]
pub struct Mp3Stream {
    frames: Vec<Frame>,
    /// Bytes occupied by a leading ID3v2 tag.
    tag_len: usize,
    /// Bytes skipped while looking for sync.
    skipped: usize,
    /// Side-info parse failures (frames whose whole main data counts as ancillary).
    unparsed_side_info: usize,
}

impl Mp3Stream {
    /// Scan `data` for frames.
    ///
    /// Never fails: a buffer with no frames yields an empty list.
    pub fn scan(data: &[u8]) -> Self {
        let tag_len = id3::tag_len(data);
        let mut frames = Vec::new();
        let mut skipped = 0usize;
        let mut pos = tag_len;

        while pos + HEADER_LEN <= data.len() {
            if !is_sync(&data[pos..]) {
                pos += 1;
                skipped += 1;
                continue;
            }
            let header = match FrameHeader::parse(&data[pos..]) {
                Ok(h) => h,
                Err(_) => {
                    pos += 1;
                    skipped += 1;
                    continue;
                }
            };
            let size = header.frame_size();
            if size < HEADER_LEN {
                pos += 1;
                skipped += 1;
                continue;
            }
            if pos + size > data.len() {
                break;
            }
            frames.push(Frame::locate(frames.len(), pos, header, data));
            pos += size;
        }

        let unparsed_side_info = frames.iter().filter(|f| f.side_info.is_none()).count();
        tracing::debug!(
            frames = frames.len(),
            tag_len,
            skipped,
            unparsed_side_info,
            "scanned carrier"
        );

        Self {
            frames,
            tag_len,
            skipped,
            unparsed_side_info,
        }
    }

    /// Frames in file order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    pub fn skipped_bytes(&self) -> usize {
        self.skipped
    }

    pub fn unparsed_side_info(&self) -> usize {
        self.unparsed_side_info
    }

    /// Sum of ancillary bytes over all frames.
    pub fn total_ancillary_bytes(&self) -> usize {
        self.frames.iter().map(|f| f.ancillary_len).sum()
    }
}
