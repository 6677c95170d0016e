// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Bitrate and sample-rate lookup tables for the MPEG audio frame header.
//!
//! Index 0 ("free format") and index 15 ("bad") carry 0 so that a lookup
//! yielding 0 means "no fixed frame size" and the header is rejected.

use super::header::{Layer, MpegVersion};

/// MPEG-1 Layer I bitrates in kbps.
const BITRATES_V1_L1: [u16; 16] = [
    0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0,
];
/// MPEG-1 Layer II bitrates in kbps.
const BITRATES_V1_L2: [u16; 16] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0,
];
/// MPEG-1 Layer III bitrates in kbps.
const BITRATES_V1_L3: [u16; 16] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
];
/// MPEG-2/2.5 Layer I bitrates in kbps.
const BITRATES_V2_L1: [u16; 16] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0,
];
/// MPEG-2/2.5 Layer II and III bitrates in kbps.
const BITRATES_V2_L23: [u16; 16] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
];

const SAMPLE_RATES_V1: [u32; 4] = [44_100, 48_000, 32_000, 0];
const SAMPLE_RATES_V2: [u32; 4] = [22_050, 24_000, 16_000, 0];
const SAMPLE_RATES_V2_5: [u32; 4] = [11_025, 12_000, 8_000, 0];

fn bitrate_table(version: MpegVersion, layer: Layer) -> &'static [u16; 16] {
    match (version, layer) {
        (MpegVersion::V1, Layer::I) => &BITRATES_V1_L1,
        (MpegVersion::V1, Layer::II) => &BITRATES_V1_L2,
        (MpegVersion::V1, Layer::III) => &BITRATES_V1_L3,
        (_, Layer::I) => &BITRATES_V2_L1,
        (_, _) => &BITRATES_V2_L23,
    }
}

fn sample_rate_table(version: MpegVersion) -> &'static [u32; 4] {
    match version {
        MpegVersion::V1 => &SAMPLE_RATES_V1,
        MpegVersion::V2 => &SAMPLE_RATES_V2,
        MpegVersion::V2_5 => &SAMPLE_RATES_V2_5,
    }
}

/// Bitrate in kbps for a 4-bit index, or 0 if the index is free/bad.
pub fn bitrate_kbps(version: MpegVersion, layer: Layer, index: u8) -> u16 {
    bitrate_table(version, layer)[(index & 0x0F) as usize]
}

/// Sample rate in Hz for a 2-bit index, or 0 if reserved.
pub fn sample_rate_hz(version: MpegVersion, index: u8) -> u32 {
    sample_rate_table(version)[(index & 0x03) as usize]
}

/// Reverse lookup: the header index encoding `kbps`, if the table has it.
pub fn bitrate_index(version: MpegVersion, layer: Layer, kbps: u16) -> Option<u8> {
    if kbps == 0 {
        return None;
    }
    bitrate_table(version, layer)
        .iter()
        .position(|&b| b == kbps)
        .map(|i| i as u8)
}

/// Reverse lookup: the header index encoding `hz`, if the table has it.
pub fn sample_rate_index(version: MpegVersion, hz: u32) -> Option<u8> {
    if hz == 0 {
        return None;
    }
    sample_rate_table(version)
        .iter()
        .position(|&r| r == hz)
        .map(|i| i as u8)
}
