// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic MP3 carriers for integration tests.
//!
//! Frames carry a valid header and side information whose `part2_3_length`
//! sum leaves exactly the requested number of ancillary bytes. Main data is
//! filled with seeded random bytes.

#![allow(dead_code)]

use ancilla_core::mp3::header::{ChannelMode, FrameHeader, Layer, MpegVersion};
use ancilla_core::mp3::side_info::SideInfo;
use ancilla_core::Mp3Stream;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn mpeg1_stereo() -> FrameHeader {
    FrameHeader {
        version: MpegVersion::V1,
        layer: Layer::III,
        crc_protected: false,
        bitrate_kbps: 128,
        sample_rate: 44_100,
        padding: false,
        channel_mode: ChannelMode::JointStereo,
    }
}

pub fn mpeg1_mono() -> FrameHeader {
    FrameHeader {
        channel_mode: ChannelMode::Mono,
        bitrate_kbps: 64,
        ..mpeg1_stereo()
    }
}

pub fn mpeg2_stereo() -> FrameHeader {
    FrameHeader {
        version: MpegVersion::V2,
        bitrate_kbps: 64,
        sample_rate: 22_050,
        ..mpeg1_stereo()
    }
}

/// Append one frame with `anc` ancillary bytes.
pub fn push_frame(out: &mut Vec<u8>, h: &FrameHeader, anc: usize, rng: &mut ChaCha8Rng) {
    let start = out.len();
    let size = h.frame_size();
    let region = size - 4 - h.side_info_size();
    assert!(anc <= region, "frame has only {region} main-data bytes");

    let used_bits = (region - anc) * 8;
    let parts = 2 * h.channels();
    let mut lengths = vec![(used_bits / parts) as u16; parts];
    lengths[parts - 1] += (used_bits % parts) as u16;

    out.extend(h.to_bytes().expect("representable header"));
    out.extend(SideInfo::with_part2_3_lengths(h.channels(), &lengths).to_bytes(h.side_info_size()));
    let mut body = vec![0u8; start + size - out.len()];
    rng.fill_bytes(&mut body);
    out.extend(body);
}

/// Carrier of `anc.len()` frames using header `h`.
pub fn carrier_with(h: &FrameHeader, anc: &[usize], seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::new();
    for &a in anc {
        push_frame(&mut out, h, a, &mut rng);
    }
    out
}

/// `frames` MPEG-1 stereo frames with `anc` ancillary bytes each.
pub fn carrier(frames: usize, anc: usize) -> Vec<u8> {
    carrier_with(&mpeg1_stereo(), &vec![anc; frames], 7)
}

/// Prefix `data` with a minimal ID3v2.3 tag of `body_len` bytes.
pub fn with_id3(data: &[u8], body_len: u32) -> Vec<u8> {
    let mut out = b"ID3".to_vec();
    out.extend_from_slice(&[3, 0, 0]);
    out.extend_from_slice(&ancilla_core::mp3::id3::encode_synchsafe(body_len));
    out.resize(10 + body_len as usize, 0);
    out.extend_from_slice(data);
    out
}

/// Byte offsets inside any ancillary region of `data`.
pub fn ancillary_mask(data: &[u8]) -> Vec<bool> {
    let mut mask = vec![false; data.len()];
    for f in Mp3Stream::scan(data).frames() {
        for i in f.ancillary_range() {
            mask[i] = true;
        }
    }
    mask
}
