// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Capacity queries and carrier inspection.
//!
//! Capacity is an estimate: it counts the bytes the ancillary locator
//! believes are unused, not bytes a decoder is guaranteed to ignore.

use serde::Serialize;

use crate::mp3::Mp3Stream;
use crate::stego::error::StegoError;
use crate::stego::framing::LENGTH_PREFIX_BYTES;
use crate::stego::payload::{self, Metadata};
use crate::stego::plan::EmbeddingPlan;

/// Aggregate capacity in bits of `plan` over `carrier`.
pub fn capacity_bits(carrier: &[u8], plan: &EmbeddingPlan) -> Result<u64, StegoError> {
    plan.validate()?;
    let stream = Mp3Stream::scan(carrier);
    Ok(plan.capacity_bits(stream.frames()))
}

/// Largest secret (in bytes) that fits alongside `metadata`.
///
/// Returns 0 if not even the framing and metadata fit.
pub fn message_capacity(
    carrier: &[u8],
    plan: &EmbeddingPlan,
    metadata: &Metadata,
) -> Result<usize, StegoError> {
    let bytes = (capacity_bits(carrier, plan)? / 8) as usize;
    let overhead = LENGTH_PREFIX_BYTES + payload::container_len(metadata, 0)?;
    Ok(bytes.saturating_sub(overhead))
}

/// Geometry of one frame, as reported by [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub index: usize,
    pub header_offset: usize,
    pub frame_size: usize,
    pub bitrate_kbps: u16,
    pub sample_rate: u32,
    pub channels: usize,
    pub main_data_offset: usize,
    pub estimated_main_data_bytes: usize,
    pub ancillary_offset: usize,
    pub ancillary_len: usize,
    pub side_info_parsed: bool,
}

/// Overview of a carrier's frames and ancillary space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierReport {
    pub carrier_len: usize,
    pub tag_len: usize,
    pub skipped_bytes: usize,
    pub frame_count: usize,
    pub frames_with_ancillary: usize,
    pub total_ancillary_bytes: usize,
    pub unparsed_side_info: usize,
    pub frames: Vec<FrameSummary>,
}

impl CarrierReport {
    /// Capacity in bits at `bits_per_byte` using every frame in file order.
    pub fn capacity_bits(&self, bits_per_byte: u8) -> u64 {
        self.total_ancillary_bytes as u64 * bits_per_byte as u64
    }
}

/// Scan `carrier` and summarize its frames.
pub fn inspect(carrier: &[u8]) -> CarrierReport {
    let stream = Mp3Stream::scan(carrier);
    let frames: Vec<FrameSummary> = stream
        .frames()
        .iter()
        .map(|f| FrameSummary {
            index: f.index,
            header_offset: f.header_offset,
            frame_size: f.frame_size,
            bitrate_kbps: f.header.bitrate_kbps,
            sample_rate: f.header.sample_rate,
            channels: f.header.channels(),
            main_data_offset: f.main_data_offset,
            estimated_main_data_bytes: f.estimated_main_data_bytes,
            ancillary_offset: f.ancillary_offset,
            ancillary_len: f.ancillary_len,
            side_info_parsed: f.side_info.is_some(),
        })
        .collect();

    CarrierReport {
        carrier_len: carrier.len(),
        tag_len: stream.tag_len(),
        skipped_bytes: stream.skipped_bytes(),
        frame_count: frames.len(),
        frames_with_ancillary: frames.iter().filter(|f| f.ancillary_len > 0).count(),
        total_ancillary_bytes: stream.total_ancillary_bytes(),
        unparsed_side_info: stream.unparsed_side_info(),
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mp3::header::{ChannelMode, FrameHeader, Layer, MpegVersion};
    use crate::mp3::side_info::SideInfo;

    fn carrier(frames: usize, anc: u16) -> Vec<u8> {
        let h = FrameHeader {
            version: MpegVersion::V1,
            layer: Layer::III,
            crc_protected: false,
            bitrate_kbps: 128,
            sample_rate: 44_100,
            padding: false,
            channel_mode: ChannelMode::Stereo,
        };
        // 381 bytes of main data region; leave `anc` bytes unused.
        let used_bits = (381 - anc) * 8;
        let per = used_bits / 4;
        let lengths = [per, per, per, used_bits - 3 * per];
        let mut out = Vec::new();
        for _ in 0..frames {
            let start = out.len();
            out.extend(h.to_bytes().unwrap());
            out.extend(SideInfo::with_part2_3_lengths(2, &lengths).to_bytes(32));
            out.resize(start + h.frame_size(), 0x33);
        }
        out
    }

    #[test]
    fn capacity_counts_selected_frames() {
        let data = carrier(10, 10);
        assert_eq!(capacity_bits(&data, &EmbeddingPlan::default()).unwrap(), 100);
        let plan = EmbeddingPlan::default().with_step(3).with_bits_per_byte(2);
        // Frames 0, 3, 6, 9.
        assert_eq!(capacity_bits(&data, &plan).unwrap(), 80);
    }

    #[test]
    fn capacity_rejects_bad_plan() {
        let plan = EmbeddingPlan::default().with_bits_per_byte(9);
        assert!(capacity_bits(&carrier(1, 10), &plan).is_err());
    }

    #[test]
    fn message_capacity_subtracts_overhead() {
        let data = carrier(20, 50);
        let plan = EmbeddingPlan::default().with_bits_per_byte(4);
        let meta = Metadata {
            file_name: "a.bin".into(),
            encrypted: false,
            random_embedding: false,
            lsb_bits: 4,
        };
        let json = serde_json::to_vec(&meta).unwrap().len();
        let cap = message_capacity(&data, &plan, &meta).unwrap();
        assert_eq!(cap, 500 - 4 - 4 - json);

        let tiny = carrier(1, 2);
        assert_eq!(message_capacity(&tiny, &plan, &meta).unwrap(), 0);
    }

    #[test]
    fn inspect_reports_geometry() {
        let mut data = vec![0u8; 3];
        data.extend(carrier(4, 12));
        let report = inspect(&data);
        assert_eq!(report.frame_count, 4);
        assert_eq!(report.skipped_bytes, 3);
        assert_eq!(report.frames_with_ancillary, 4);
        assert_eq!(report.total_ancillary_bytes, 48);
        assert_eq!(report.capacity_bits(2), 96);
        let f = &report.frames[1];
        assert_eq!(f.header_offset, 3 + 417);
        assert_eq!(f.channels, 2);
        assert_eq!(f.ancillary_len, 12);
        assert!(f.side_info_parsed);
    }

    #[test]
    fn report_capacity_matches_default_plan() {
        let data = carrier(6, 9);
        let report = inspect(&data);
        for k in 1..=4 {
            let plan = EmbeddingPlan::default().with_bits_per_byte(k);
            assert_eq!(report.capacity_bits(k), capacity_bits(&data, &plan).unwrap());
        }
    }

    #[test]
    fn inspect_empty_carrier() {
        let report = inspect(&[]);
        assert_eq!(report.frame_count, 0);
        assert_eq!(report.total_ancillary_bytes, 0);
        assert!(report.frames.is_empty());
    }

    #[test]
    fn report_serializes() {
        let json = serde_json::to_value(inspect(&carrier(1, 5))).unwrap();
        assert_eq!(json["frame_count"], 1);
        assert_eq!(json["frames"][0]["ancillary_len"], 5);
    }
}
