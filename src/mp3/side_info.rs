// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Layer III side information.
//!
//! Only `part2_3_length` feeds the ancillary estimate. Every other field is
//! read solely to keep the bit cursor aligned, so the per-granule tail is
//! described as a list of field widths and skipped in one pass.
//!
//! Layout as read here:
//!
//! ```text
//! main_data_begin   9
//! private_bits      3
//! for gr in 0..2, ch in 0..channels:
//!     part2_3_length      12
//!     big_values           9
//!     global_gain          8
//!     scalefac_compress    4
//!     window_switching     1
//!     switched:   2 1 5 5 5 3 3 3 4 3   (block type .. region counts)
//!     otherwise:  5 5 5 4 3 1 1 1       (table select .. count1 table)
//! scfsi             4 per channel
//! ```
//!
//! With a switched granule the field list runs past the 17/32-byte region
//! and the parse fails; callers treat that as zero estimated usage.

use super::bitio::{BitReader, BitWriter};
use super::error::{Mp3Error, Result};

/// Number of granules per frame.
pub const GRANULES: usize = 2;

const SWITCHED_TAIL: [u8; 10] = [2, 1, 5, 5, 5, 3, 3, 3, 4, 3];
const UNSWITCHED_TAIL: [u8; 8] = [5, 5, 5, 4, 3, 1, 1, 1];

fn tail_bits(switched: bool) -> usize {
    let widths: &[u8] = if switched { &SWITCHED_TAIL } else { &UNSWITCHED_TAIL };
    widths.iter().map(|&w| w as usize).sum()
}

/// Per granule, per channel fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GranuleChannel {
    /// Main-data bits consumed by this granule/channel.
    pub part2_3_length: u16,
    pub big_values: u16,
    pub global_gain: u8,
    pub scalefac_compress: u8,
    pub window_switching: bool,
}

/// Parsed side information for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideInfo {
    pub main_data_begin: u16,
    pub private_bits: u8,
    /// `granules[gr][ch]`.
    pub granules: [Vec<GranuleChannel>; GRANULES],
    /// Scale-factor selection info, one nibble per channel.
    pub scfsi: Vec<u8>,
}

impl SideInfo {
    /// Parse side information for a frame with `channels` channels (1 or 2).
    pub fn parse(data: &[u8], channels: usize) -> Result<Self> {
        let mut r = BitReader::new(data);
        Self::read(&mut r, channels).map_err(|e| match e {
            Mp3Error::UnexpectedEof => Mp3Error::SideInfoTruncated {
                needed_bits: Self::min_bits(channels).max(r.position() + 1),
                available_bits: data.len() * 8,
            },
            other => other,
        })
    }

    fn read(r: &mut BitReader<'_>, channels: usize) -> Result<Self> {
        let main_data_begin = r.read_bits(9)? as u16;
        let private_bits = r.read_bits(3)? as u8;

        let mut granules: [Vec<GranuleChannel>; GRANULES] = Default::default();
        for granule in granules.iter_mut() {
            for _ in 0..channels {
                let part2_3_length = r.read_bits(12)? as u16;
                let big_values = r.read_bits(9)? as u16;
                let global_gain = r.read_bits(8)? as u8;
                let scalefac_compress = r.read_bits(4)? as u8;
                let window_switching = r.read_bits(1)? == 1;
                r.skip_bits(tail_bits(window_switching))?;
                granule.push(GranuleChannel {
                    part2_3_length,
                    big_values,
                    global_gain,
                    scalefac_compress,
                    window_switching,
                });
            }
        }

        let mut scfsi = Vec::with_capacity(channels);
        for _ in 0..channels {
            scfsi.push(r.read_bits(4)? as u8);
        }

        Ok(Self {
            main_data_begin,
            private_bits,
            granules,
            scfsi,
        })
    }

    /// Bits needed when no granule uses window switching.
    pub fn min_bits(channels: usize) -> usize {
        12 + GRANULES * channels * (34 + tail_bits(false)) + 4 * channels
    }

    /// Sum of `part2_3_length` over all granules and channels.
    pub fn total_part2_3_bits(&self) -> u32 {
        self.granules
            .iter()
            .flatten()
            .map(|gc| gc.part2_3_length as u32)
            .sum()
    }

    pub fn channels(&self) -> usize {
        self.granules[0].len()
    }

    /// Serialize in the same field order [`SideInfo::parse`] reads.
    ///
    /// Skipped tail fields are written as zero. The result is zero-padded to
    /// at least `min_len` bytes.
    pub fn to_bytes(&self, min_len: usize) -> Vec<u8> {
        let mut w = BitWriter::new();
        w.write_bits(self.main_data_begin as u32, 9);
        w.write_bits(self.private_bits as u32, 3);
        for granule in &self.granules {
            for gc in granule {
                w.write_bits(gc.part2_3_length as u32, 12);
                w.write_bits(gc.big_values as u32, 9);
                w.write_bits(gc.global_gain as u32, 8);
                w.write_bits(gc.scalefac_compress as u32, 4);
                w.write_bits(gc.window_switching as u32, 1);
                let widths: &[u8] = if gc.window_switching {
                    &SWITCHED_TAIL
                } else {
                    &UNSWITCHED_TAIL
                };
                for &width in widths {
                    w.write_bits(0, width);
                }
            }
        }
        for &s in &self.scfsi {
            w.write_bits(s as u32, 4);
        }
        let mut out = w.flush();
        if out.len() < min_len {
            out.resize(min_len, 0);
        }
        out
    }

    /// Side information whose granules all carry the given lengths.
    ///
    /// `lengths[gr * channels + ch]` becomes `part2_3_length`.
    pub fn with_part2_3_lengths(channels: usize, lengths: &[u16]) -> Self {
        debug_assert_eq!(lengths.len(), GRANULES * channels);
        let mut granules: [Vec<GranuleChannel>; GRANULES] = Default::default();
        for (gr, granule) in granules.iter_mut().enumerate() {
            for ch in 0..channels {
                granule.push(GranuleChannel {
                    part2_3_length: lengths[gr * channels + ch] & 0x0FFF,
                    ..GranuleChannel::default()
                });
            }
        }
        Self {
            main_data_begin: 0,
            private_bits: 0,
            granules,
            scfsi: vec![0; channels],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mp3::header::{SIDE_INFO_MONO, SIDE_INFO_STEREO};

    #[test]
    fn unswitched_layout_fits_nominal_sizes() {
        assert!(SideInfo::min_bits(1) <= SIDE_INFO_MONO * 8);
        assert_eq!(SideInfo::min_bits(2), SIDE_INFO_STEREO * 8);
    }

    #[test]
    fn stereo_roundtrip_sums_lengths() {
        let si = SideInfo::with_part2_3_lengths(2, &[100, 200, 300, 400]);
        let bytes = si.to_bytes(SIDE_INFO_STEREO);
        assert_eq!(bytes.len(), SIDE_INFO_STEREO);

        let parsed = SideInfo::parse(&bytes, 2).unwrap();
        assert_eq!(parsed.channels(), 2);
        assert_eq!(parsed.total_part2_3_bits(), 1000);
        assert_eq!(parsed.granules[1][0].part2_3_length, 300);
    }

    #[test]
    fn mono_roundtrip() {
        let mut si = SideInfo::with_part2_3_lengths(1, &[4095, 1]);
        si.main_data_begin = 0x1AB;
        si.scfsi = vec![0b1010];
        si.granules[0][0].global_gain = 210;
        let bytes = si.to_bytes(SIDE_INFO_MONO);
        assert_eq!(bytes.len(), SIDE_INFO_MONO);

        let parsed = SideInfo::parse(&bytes, 1).unwrap();
        assert_eq!(parsed, si);
        assert_eq!(parsed.total_part2_3_bits(), 4096);
    }

    #[test]
    fn truncated_region_fails() {
        let bytes = SideInfo::with_part2_3_lengths(2, &[1, 2, 3, 4]).to_bytes(SIDE_INFO_STEREO);
        let err = SideInfo::parse(&bytes[..20], 2).unwrap_err();
        assert!(matches!(err, Mp3Error::SideInfoTruncated { available_bits: 160, .. }));
    }

    #[test]
    fn window_switching_overruns_nominal_region() {
        let mut si = SideInfo::with_part2_3_lengths(2, &[10, 10, 10, 10]);
        si.granules[0][1].window_switching = true;
        let bytes = si.to_bytes(SIDE_INFO_STEREO);
        assert!(bytes.len() > SIDE_INFO_STEREO);

        // Parses when all bits are supplied.
        let parsed = SideInfo::parse(&bytes, 2).unwrap();
        assert!(parsed.granules[0][1].window_switching);
        assert_eq!(parsed.total_part2_3_bits(), 40);

        // Fails when restricted to the nominal region.
        assert!(SideInfo::parse(&bytes[..SIDE_INFO_STEREO], 2).is_err());
    }
}
