// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Frame geometry and ancillary-region location.
//!
//! For every frame the region after the estimated main data is treated as
//! ancillary (ignored by the decoder):
//!
//! ```text
//! header_offset
//! |-- 4 --|-- side info --|-- estimated main data --|-- ancillary --|
//!                         main_data_offset          ancillary_offset  frame end
//! ```
//!
//! The estimate is `ceil(sum(part2_3_length) / 8)` bytes, clamped to the
//! space the frame actually has. It ignores the bit reservoir
//! (`main_data_begin`) and is not checked against a real Huffman decode, so
//! a decoder may still read some of these bytes. When the side information
//! cannot be parsed the usage is taken as zero and the whole post-side-info
//! region becomes ancillary.

use std::ops::Range;

use super::header::{FrameHeader, HEADER_LEN};
use super::side_info::SideInfo;

/// One audio frame with its ancillary region.
///
/// Invariants: `header_offset + frame_size <= buffer length`,
/// `ancillary_offset + ancillary_len == header_offset + frame_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position in file order.
    pub index: usize,
    /// Absolute offset of the sync word.
    pub header_offset: usize,
    /// Header-derived length including the header.
    pub frame_size: usize,
    pub side_info_offset: usize,
    pub side_info_size: usize,
    pub main_data_offset: usize,
    pub estimated_main_data_bytes: usize,
    pub ancillary_offset: usize,
    pub ancillary_len: usize,
    pub header: FrameHeader,
    /// `None` when the side information could not be parsed.
    pub side_info: Option<SideInfo>,
}

impl Frame {
    /// Build the frame record for a header found at `header_offset`.
    ///
    /// The caller guarantees the whole frame lies inside `data`.
    pub fn locate(index: usize, header_offset: usize, header: FrameHeader, data: &[u8]) -> Self {
        let frame_size = header.frame_size();
        let end = header_offset + frame_size;
        debug_assert!(end <= data.len());

        let side_info_size = header.side_info_size();
        let side_info_offset = header_offset + HEADER_LEN;
        let main_data_offset = (side_info_offset + side_info_size).min(end);

        let side_info_end = main_data_offset;
        let side_info_bytes = &data[side_info_offset.min(end)..side_info_end];
        let side_info = match SideInfo::parse(side_info_bytes, header.channels()) {
            Ok(si) => Some(si),
            Err(e) => {
                tracing::trace!(
                    frame = index,
                    offset = header_offset,
                    error = %e,
                    "side info unparsed; assuming zero usage"
                );
                None
            }
        };

        let used_bits = side_info.as_ref().map_or(0, SideInfo::total_part2_3_bits) as usize;
        let max_main = frame_size.saturating_sub(side_info_size + HEADER_LEN);
        let estimated_main_data_bytes = ((used_bits + 7) / 8).min(max_main);

        let ancillary_offset = main_data_offset + estimated_main_data_bytes;
        let ancillary_len = end - ancillary_offset;

        Self {
            index,
            header_offset,
            frame_size,
            side_info_offset,
            side_info_size,
            main_data_offset,
            estimated_main_data_bytes,
            ancillary_offset,
            ancillary_len,
            header,
            side_info,
        }
    }

    /// Offset one past the last byte of the frame.
    pub fn end(&self) -> usize {
        self.header_offset + self.frame_size
    }

    /// Absolute byte range of the ancillary region.
    pub fn ancillary_range(&self) -> Range<usize> {
        self.ancillary_offset..self.ancillary_offset + self.ancillary_len
    }

    pub fn has_ancillary(&self) -> bool {
        self.ancillary_len > 0
    }
}
