// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! The 4-byte MPEG audio frame header.
//!
//! ```text
//! byte 0   1111_1111                 sync (high 8 bits)
//! byte 1   111V_VLLP                 sync (low 3), version, layer, protection
//! byte 2   BBBB_SSpx                 bitrate idx, sample-rate idx, padding, private
//! byte 3   CCmm_coEE                 channel mode, mode ext, copyright, original, emphasis
//! ```
//!
//! Frame length uses the simplified model `floor(coeff * bitrate / rate) + padding`
//! with `coeff` = 144 for MPEG-1 Layer III, 72 for MPEG-2/2.5 Layer III, and
//! 144 for Layers I/II. The CRC word that follows a protected header is not
//! accounted for; side information is assumed to start right after byte 3.

use super::error::{Mp3Error, Result};
use super::tables;

/// Length of the frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Side information length for single-channel frames.
pub const SIDE_INFO_MONO: usize = 17;
/// Side information length for two-channel frames.
pub const SIDE_INFO_STEREO: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    V1,
    V2,
    V2_5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    I,
    II,
    III,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

impl ChannelMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Stereo,
            1 => Self::JointStereo,
            2 => Self::DualChannel,
            _ => Self::Mono,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::Stereo => 0,
            Self::JointStereo => 1,
            Self::DualChannel => 2,
            Self::Mono => 3,
        }
    }

    /// Number of audio channels carried by the frame.
    pub fn channels(self) -> usize {
        if self == Self::Mono { 1 } else { 2 }
    }
}

/// Decoded frame header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    /// `true` when the protection bit is clear (a CRC word follows).
    pub crc_protected: bool,
    pub bitrate_kbps: u16,
    pub sample_rate: u32,
    pub padding: bool,
    pub channel_mode: ChannelMode,
}

/// Returns `true` if `bytes` starts with the 11-bit frame sync.
pub fn is_sync(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0
}

impl FrameHeader {
    /// Decode a header from the first 4 bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Mp3Error::UnexpectedEof);
        }
        if !is_sync(bytes) {
            return Err(Mp3Error::NoSync);
        }
        let (b1, b2, b3) = (bytes[1], bytes[2], bytes[3]);

        let version = match (b1 >> 3) & 0x03 {
            0b11 => MpegVersion::V1,
            0b10 => MpegVersion::V2,
            0b00 => MpegVersion::V2_5,
            _ => return Err(Mp3Error::ReservedVersion),
        };
        let layer = match (b1 >> 1) & 0x03 {
            0b01 => Layer::III,
            0b10 => Layer::II,
            0b11 => Layer::I,
            _ => return Err(Mp3Error::ReservedLayer),
        };

        let bitrate_idx = (b2 >> 4) & 0x0F;
        let sample_rate_idx = (b2 >> 2) & 0x03;

        let bitrate_kbps = tables::bitrate_kbps(version, layer, bitrate_idx);
        if bitrate_kbps == 0 {
            return Err(Mp3Error::InvalidBitrate(bitrate_idx));
        }
        let sample_rate = tables::sample_rate_hz(version, sample_rate_idx);
        if sample_rate == 0 {
            return Err(Mp3Error::InvalidSampleRate(sample_rate_idx));
        }

        Ok(Self {
            version,
            layer,
            crc_protected: b1 & 0x01 == 0,
            bitrate_kbps,
            sample_rate,
            padding: (b2 >> 1) & 0x01 == 1,
            channel_mode: ChannelMode::from_bits(b3 >> 6),
        })
    }

    /// Encode the header back into 4 bytes.
    ///
    /// Returns `None` if the bitrate or sample rate is not representable for
    /// this version/layer. Mode extension, copyright, original and emphasis
    /// bits are written as zero.
    pub fn to_bytes(&self) -> Option<[u8; HEADER_LEN]> {
        let br = tables::bitrate_index(self.version, self.layer, self.bitrate_kbps)?;
        let sr = tables::sample_rate_index(self.version, self.sample_rate)?;

        let version_bits = match self.version {
            MpegVersion::V1 => 0b11,
            MpegVersion::V2 => 0b10,
            MpegVersion::V2_5 => 0b00,
        };
        let layer_bits = match self.layer {
            Layer::III => 0b01,
            Layer::II => 0b10,
            Layer::I => 0b11,
        };
        let protection = if self.crc_protected { 0 } else { 1 };

        Some([
            0xFF,
            0xE0 | (version_bits << 3) | (layer_bits << 1) | protection,
            (br << 4) | (sr << 2) | ((self.padding as u8) << 1),
            self.channel_mode.bits() << 6,
        ])
    }

    /// Frame length in bytes, including the header.
    ///
    /// `sample_rate` must be non-zero. [`FrameHeader::parse`] never yields
    /// 0, so this only matters for hand-built headers.
    pub fn frame_size(&self) -> usize {
        debug_assert!(self.sample_rate != 0, "frame_size needs a non-zero sample rate");
        let coeff: u64 = match (self.layer, self.version) {
            (Layer::III, MpegVersion::V1) => 144,
            (Layer::III, _) => 72,
            _ => 144,
        };
        let bitrate = self.bitrate_kbps as u64 * 1000;
        (coeff * bitrate / self.sample_rate as u64) as usize + self.padding as usize
    }

    /// Side information length: 17 bytes for mono, 32 otherwise.
    pub fn side_info_size(&self) -> usize {
        match self.channel_mode {
            ChannelMode::Mono => SIDE_INFO_MONO,
            _ => SIDE_INFO_STEREO,
        }
    }

    pub fn channels(&self) -> usize {
        self.channel_mode.channels()
    }
}
